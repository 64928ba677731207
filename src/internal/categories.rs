use crate::internal::models::Category;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Identifier of the synthetic pill that shows every category.
pub const ALL_CATEGORIES: &str = "all";

/// Primary categories, in display order, with their short pill labels.
pub const PRIMARY_CATEGORIES: [(&str, &str); 16] = [
    ("Programming", "Programming"),
    ("AI & ML", "AI & ML"),
    ("Web Development", "Web Dev"),
    ("Startups", "Startups"),
    ("Security", "Security"),
    ("DevOps", "DevOps"),
    ("Mobile Dev", "Mobile"),
    ("Design & UX", "Design"),
    ("Data", "Data"),
    ("Show HN", "Show HN"),
    ("Ask HN", "Ask HN"),
    ("Science & Research", "Science"),
    ("Crypto & Web3", "Crypto"),
    ("Tech Companies", "Tech Co."),
    ("Hardware", "Hardware"),
    ("Jobs & Careers", "Jobs"),
];

static PRIMARY_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    PRIMARY_CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, (key, _))| (*key, i))
        .collect()
});

/// A clickable category chip: `name` is sent to the backend, `label` is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPill {
    pub name: String,
    pub label: String,
    pub count: i64,
}

impl CategoryPill {
    pub fn all() -> Self {
        Self {
            name: ALL_CATEGORIES.to_string(),
            label: "All".to_string(),
            count: 0,
        }
    }
}

/// Order backend categories for the pill bar.
///
/// Primary categories come first in their fixed order, then every other
/// category by descending count. Categories without stories are dropped.
/// The "All" pill is not included.
pub fn order_categories(categories: &[Category]) -> Vec<CategoryPill> {
    let mut primary: Vec<Option<CategoryPill>> = vec![None; PRIMARY_CATEGORIES.len()];
    let mut others: Vec<CategoryPill> = Vec::new();

    for cat in categories.iter().filter(|c| c.count > 0) {
        match PRIMARY_INDEX.get(cat.name.as_str()) {
            Some(&i) => {
                // First occurrence wins if the backend repeats a name
                if primary[i].is_none() {
                    primary[i] = Some(CategoryPill {
                        name: cat.name.clone(),
                        label: PRIMARY_CATEGORIES[i].1.to_string(),
                        count: cat.count,
                    });
                }
            }
            None => others.push(CategoryPill {
                name: cat.name.clone(),
                label: cat.name.clone(),
                count: cat.count,
            }),
        }
    }

    others.sort_by(|a, b| b.count.cmp(&a.count));

    primary.into_iter().flatten().chain(others).collect()
}

/// Full pill bar: "All" followed by [`order_categories`].
pub fn build_pills(categories: &[Category]) -> Vec<CategoryPill> {
    std::iter::once(CategoryPill::all())
        .chain(order_categories(categories))
        .collect()
}

/// Header suffix for the selected category, e.g. "(All)" or "(Programming)".
pub fn selected_category_label(active: &str) -> String {
    match active {
        ALL_CATEGORIES => "(All)".to_string(),
        name => format!("({})", name),
    }
}
