#[cfg(test)]
pub mod test {
    use crate::reconcile::{DeclaredKeys, Mapping};

    pub fn keys(names: &[&str]) -> DeclaredKeys {
        DeclaredKeys::new(names.iter().copied())
    }

    pub fn mapping(pairs: &[(&str, &str)]) -> Mapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -- Documents as the store writes them -----------------------------------

    pub const SQL_JSON: &str = "{\n  \"sql_username\": \"un\",\n  \"sql_password\": \"pwd\"\n}\n";

    pub const SQL_TOML: &str = "# database login\nsql_username = \"un\"\n\n# keep this secret\nsql_password = \"pwd\"\n";
}
