use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A help resource shown to a visitor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "link_id")]
    pub id: i64,
    #[serde(rename = "link_url")]
    pub url: String,
    #[serde(rename = "link_label")]
    pub label: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordStatus {
    #[default]
    Active,
}

impl KeywordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordStatus::Active => "active",
        }
    }
}

impl fmt::Display for KeywordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown keyword status {:?}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for KeywordStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(KeywordStatus::Active),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A search term administrators attach to links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    #[serde(rename = "keyword_id")]
    pub id: i64,
    #[serde(rename = "keyword_text")]
    pub text: String,
    #[serde(rename = "keyword_status")]
    pub status: KeywordStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Association {
    pub link_id: i64,
    pub keyword_id: i64,
}

/// A decoded row of any managed table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Link(Link),
    Keyword(Keyword),
    Association(Association),
}

impl Record {
    pub fn into_link(self) -> Option<Link> {
        match self {
            Record::Link(link) => Some(link),
            _ => None,
        }
    }

    pub fn into_keyword(self) -> Option<Keyword> {
        match self {
            Record::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }

    pub fn into_association(self) -> Option<Association> {
        match self {
            Record::Association(association) => Some(association),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_serializes_with_column_names() {
        let link = Link {
            id: 7,
            url: "https://x/billing".to_string(),
            label: "Billing help".to_string(),
        };
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["link_id"], 7);
        assert_eq!(json["link_url"], "https://x/billing");
        assert_eq!(json["link_label"], "Billing help");
    }

    #[test]
    fn keyword_status_parses_active_only() {
        assert_eq!("active".parse::<KeywordStatus>(), Ok(KeywordStatus::Active));
        assert!("archived".parse::<KeywordStatus>().is_err());
    }
}
