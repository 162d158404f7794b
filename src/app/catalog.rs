use crate::domain::model::Branch;

/// Static description of a branch shown on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogBranch {
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const CATALOG: &[CatalogBranch] = &[
    CatalogBranch {
        slug: "computer",
        name: "Computer Engineering",
        description: "Software, hardware, and computing systems",
    },
    CatalogBranch {
        slug: "it",
        name: "Information Technology",
        description: "Networks, databases, and IT infrastructure",
    },
    CatalogBranch {
        slug: "mechanical",
        name: "Mechanical Engineering",
        description: "Machines, thermodynamics, and manufacturing",
    },
    CatalogBranch {
        slug: "electrical",
        name: "Electrical Engineering",
        description: "Power systems, circuits, and electronics",
    },
    CatalogBranch {
        slug: "civil",
        name: "Civil Engineering",
        description: "Construction, structures, and infrastructure",
    },
    CatalogBranch {
        slug: "electronics",
        name: "Electronics Engineering",
        description: "Electronic devices, circuits, and communication",
    },
    CatalogBranch {
        slug: "automobile",
        name: "Automobile Engineering",
        description: "Vehicle design, engines, and automotive systems",
    },
];

pub fn by_slug(slug: &str) -> Option<&'static CatalogBranch> {
    CATALOG.iter().find(|entry| entry.slug == slug)
}

/// First catalog entry whose display name contains `name`, ignoring case.
pub fn by_name(name: &str) -> Option<&'static CatalogBranch> {
    let needle = name.to_lowercase();
    CATALOG
        .iter()
        .find(|entry| entry.name.to_lowercase().contains(&needle))
}

/// The backend branch that maps onto the catalog entry `slug`.
pub fn backend_branch<'a>(branches: &'a [Branch], slug: &str) -> Option<&'a Branch> {
    branches
        .iter()
        .find(|branch| by_name(&branch.name).map(|entry| entry.slug) == Some(slug))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(id: u64, name: &str) -> Branch {
        Branch {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_by_name_is_case_insensitive_containment() {
        assert_eq!(by_name("computer").map(|e| e.slug), Some("computer"));
        assert_eq!(by_name("ELECTRONICS").map(|e| e.slug), Some("electronics"));
        assert_eq!(by_name("Electrical Engineering").map(|e| e.slug), Some("electrical"));
        assert_eq!(by_name("Aerospace"), None);
    }

    #[test]
    fn test_backend_branch_lookup() {
        let branches = vec![branch(1, "Mechanical"), branch(2, "Computer")];
        assert_eq!(backend_branch(&branches, "computer").map(|b| b.id), Some(2));
        assert_eq!(backend_branch(&branches, "civil"), None);
    }

    #[test]
    fn test_catalog_slugs_are_unique() {
        for (i, entry) in CATALOG.iter().enumerate() {
            assert!(CATALOG[i + 1..].iter().all(|other| other.slug != entry.slug));
            assert_eq!(by_slug(entry.slug), Some(entry));
        }
    }
}
