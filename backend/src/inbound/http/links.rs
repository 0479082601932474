//! Navigational `_links` attached to resource representations.

use serde::Serialize;
use utoipa::ToSchema;

/// A single hypermedia link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Link {
    /// Relative URL of the target.
    #[schema(example = "/offers/5")]
    pub href: String,
}

/// Links advertised by a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Links {
    /// The resource itself.
    #[serde(rename = "self")]
    pub self_link: Link,
    /// Full replacement (`PUT`).
    pub update: Link,
    /// Partial update (`PATCH`).
    pub patch: Link,
    /// Removal (`DELETE`), when the resource can be deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Link>,
}

impl Links {
    /// Links for a resource that supports read, replace and patch.
    pub(crate) fn editable(collection: &str, id: impl std::fmt::Display) -> Self {
        let href = format!("/{collection}/{id}");
        let link = || Link { href: href.clone() };
        Self {
            self_link: link(),
            update: link(),
            patch: link(),
            delete: None,
        }
    }

    /// Links for a resource that can also be deleted.
    pub(crate) fn deletable(collection: &str, id: impl std::fmt::Display) -> Self {
        let mut links = Self::editable(collection, id);
        links.delete = Some(links.self_link.clone());
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn offers_have_no_delete_link() {
        let links = serde_json::to_value(Links::editable("offers", 5)).expect("serialise");
        assert_eq!(
            links,
            json!({
                "self": {"href": "/offers/5"},
                "update": {"href": "/offers/5"},
                "patch": {"href": "/offers/5"},
            })
        );
    }

    #[rstest]
    fn deletable_resources_advertise_delete() {
        let links = Links::deletable("games", 9);
        assert_eq!(links.delete, Some(Link { href: "/games/9".to_owned() }));
    }
}
