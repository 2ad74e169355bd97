//! Repository and branch models

use serde::{Deserialize, Serialize};

/// Repository as listed under an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// `owner/repo`, unique across the run
    pub full_name: String,

    /// Repository name without owner
    pub name: String,

    /// Browser URL
    pub html_url: String,
}

/// Branch of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_ignores_unknown_fields() {
        let json = r#"{
            "id": 1296269,
            "full_name": "acme/widgets",
            "name": "widgets",
            "html_url": "https://github.com/acme/widgets",
            "private": false,
            "owner": { "login": "acme" }
        }"#;

        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.full_name, "acme/widgets");
        assert_eq!(repo.name, "widgets");
        assert_eq!(repo.html_url, "https://github.com/acme/widgets");
    }

    #[test]
    fn test_branch_from_api_shape() {
        let json = r#"[
            { "name": "main", "commit": { "sha": "abc" }, "protected": true },
            { "name": "dev", "commit": { "sha": "def" }, "protected": false }
        ]"#;

        let branches: Vec<Branch> = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["main", "dev"]);
    }
}
