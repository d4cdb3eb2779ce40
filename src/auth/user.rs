use serde::{Deserialize, Serialize};

use super::random::random_suffix;

/// Mock user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub picture: String,
}

impl MockUser {
    /// The static profile displayed on the dashboard.
    pub fn dashboard() -> Self {
        Self {
            id: "109876543210987654321".to_string(),
            name: "Avery Developer".to_string(),
            email: "avery.developer@example.com".to_string(),
            picture: "https://i.pravatar.cc/150?img=1".to_string(),
        }
    }

    /// A profile "fetched" during the code exchange, with a random id.
    pub fn generated() -> Self {
        Self {
            id: format!("user_{}", random_suffix()),
            name: "Demo User".to_string(),
            email: "demo@oauth-academy.dev".to_string(),
            picture: "https://api.dicebear.com/7.x/avataaars/svg?seed=demo".to_string(),
        }
    }

    /// Avatar fallback letter.
    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('U')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_random() {
        let a = MockUser::generated();
        let b = MockUser::generated();
        assert!(a.id.starts_with("user_"));
        assert_eq!(a.id.len(), "user_".len() + 9);
        assert_eq!(a.name, b.name);
    }

    #[test]
    fn initial_falls_back_for_empty_names() {
        let mut user = MockUser::dashboard();
        assert_eq!(user.initial(), 'A');
        user.name.clear();
        assert_eq!(user.initial(), 'U');
    }
}
