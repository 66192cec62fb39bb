//! Account roles, capabilities, and the static category table.
//!
//! Roles are a closed enum rather than an inheritance hierarchy; what a
//! role may do is answered by the pure function [`permissions_for`]. The
//! category table is an immutable lookup built once at first use and never
//! mutated afterwards.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The kind of account, with only the fields that kind needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountRole {
    /// A buyer browsing the marketplace.
    Customer,
    /// A producer selling through the marketplace.
    Farmer {
        /// Display name of the farm the account sells under.
        farm_name: String,
    },
}

/// Things an account may do, gated by role and the admin flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    BrowseCatalog,
    PlaceOrders,
    WriteReviews,
    ManageListings,
    ViewSalesReports,
    ManageUsers,
    ModerateReviews,
}

/// Capabilities granted to a role.
///
/// Pure function of its inputs; admin accounts gain the management
/// capabilities on top of their role's own set.
#[must_use]
pub fn permissions_for(role: &AccountRole, is_admin: bool) -> HashSet<Capability> {
    let mut caps: HashSet<Capability> = match role {
        AccountRole::Customer => [
            Capability::BrowseCatalog,
            Capability::PlaceOrders,
            Capability::WriteReviews,
        ]
        .into(),
        AccountRole::Farmer { .. } => [
            Capability::BrowseCatalog,
            Capability::ManageListings,
            Capability::ViewSalesReports,
        ]
        .into(),
    };

    if is_admin {
        caps.insert(Capability::ManageUsers);
        caps.insert(Capability::ModerateReviews);
    }

    caps
}

/// Display metadata for a product category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryInfo {
    /// Icon shown next to the category.
    pub icon: &'static str,
    /// Tags suggested when listing under this category.
    pub suggested_tags: &'static [&'static str],
}

static CATEGORIES: Lazy<HashMap<&'static str, CategoryInfo>> = Lazy::new(|| {
    HashMap::from([
        (
            "vegetables",
            CategoryInfo {
                icon: "🥕",
                suggested_tags: &["organic", "seasonal", "local"],
            },
        ),
        (
            "fruits",
            CategoryInfo {
                icon: "🍎",
                suggested_tags: &["fresh", "seasonal", "orchard"],
            },
        ),
        (
            "dairy",
            CategoryInfo {
                icon: "🧀",
                suggested_tags: &["raw", "pasture-raised", "artisan"],
            },
        ),
        (
            "grains",
            CategoryInfo {
                icon: "🌾",
                suggested_tags: &["whole", "stone-ground", "heritage"],
            },
        ),
        (
            "meat",
            CategoryInfo {
                icon: "🥩",
                suggested_tags: &["grass-fed", "free-range", "pasture-raised"],
            },
        ),
        (
            "honey",
            CategoryInfo {
                icon: "🍯",
                suggested_tags: &["raw", "wildflower", "local"],
            },
        ),
    ])
});

/// Look up display metadata for a category.
#[must_use]
pub fn category_info(category: &str) -> Option<&'static CategoryInfo> {
    CATEGORIES.get(category)
}

/// All known category names.
pub fn categories() -> impl Iterator<Item = &'static str> {
    CATEGORIES.keys().copied()
}
