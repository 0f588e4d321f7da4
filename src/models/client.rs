use serde::{Deserialize, Serialize};

/// A client (case subject) visible to the authenticated caseworker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Agency-assigned case identifier, distinct from the database id
    pub client_id: String,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One page of client search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSearchPage {
    pub clients: Vec<Client>,
    pub total: u32,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_page() {
        let json = r#"{
            "clients": [
                {"id": "c1", "first_name": "Jordan", "last_name": "Reyes", "client_id": "CL-1042"}
            ],
            "total": 14,
            "page": 2,
            "page_size": 10,
            "total_pages": 2
        }"#;
        let page: ClientSearchPage =
            serde_json::from_str(json).expect("Failed to parse search page");
        assert_eq!(page.total, 14);
        assert_eq!(page.clients.len(), 1);
        assert_eq!(page.clients[0].full_name(), "Jordan Reyes");
        assert_eq!(page.clients[0].client_id, "CL-1042");
    }
}
