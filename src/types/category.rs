// src/types/category.rs
//! Medical specialty categories shown on the browse-categories page

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::filter::{FacetValue, Record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub desc: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Category {
    pub fn new(id: &str, name: &str, desc: &str, image: &str, tags: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            desc: desc.to_string(),
            image: Some(image.to_string()),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl Record for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.desc]
    }

    fn facet(&self, facet: &str) -> Option<FacetValue<'_>> {
        match facet {
            "tags" => Some(FacetValue::Tags(&self.tags)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    categories: Vec<Category>,
}

/// Read a category table from a YAML file with a top-level `categories` list
pub fn load_catalog(path: &Path) -> Result<Vec<Category>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read category catalog: {}", path.display()))?;
    let file: CatalogFile = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse category catalog: {}", path.display()))?;

    let mut seen = BTreeSet::new();
    for category in &file.categories {
        if !seen.insert(category.id.as_str()) {
            anyhow::bail!("Duplicate category id in catalog: {}", category.id);
        }
    }

    Ok(file.categories)
}

/// Sorted, de-duplicated union of every category's tags
pub fn all_tags(categories: &[Category]) -> Vec<String> {
    categories
        .iter()
        .flat_map(|c| c.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

const IMAGE_QUERY: &str = "?auto=format&fit=crop&q=80&w=600&h=300";

fn unsplash(photo: &str) -> String {
    format!("https://images.unsplash.com/{}{}", photo, IMAGE_QUERY)
}

/// Built-in specialty table used when no catalog file is configured
pub fn default_catalog() -> Vec<Category> {
    let rows: [(&str, &str, &str, &str, [&str; 3]); 14] = [
        ("1", "Cardiology", "Heart and blood vessel health specialists.", "photo-1628348068343-c6a848d2b6dd", ["Heart", "Surgery", "Hospital"]),
        ("2", "Dermatology", "Skin, hair, and nail health experts.", "photo-1576091160550-2173bdd99625", ["Skin", "Cosmetic", "Clinic"]),
        ("3", "Orthopedics", "Musculoskeletal system care and surgery.", "photo-1583454155184-870a1f63aebc", ["Bones", "Surgery", "Physical Therapy"]),
        ("4", "Neurology", "Brain and nervous system disorders.", "photo-1559757175-5700dde675bc", ["Brain", "Nerves", "Specialist"]),
        ("5", "Oncology", "Cancer diagnosis and treatment.", "photo-1579154204601-01588f351e67", ["Cancer", "Chemo", "Hospital"]),
        ("6", "Psychiatry", "Mental health and emotional wellness.", "photo-1527137342181-19aab11a8ee1", ["Mental Health", "Therapy", "Clinical"]),
        ("7", "Pediatrics", "Comprehensive medical care for infants and children.", "photo-1584820927498-cfe5211fd8bf", ["Children", "Clinic", "General"]),
        ("8", "Radiology", "Imaging and diagnostic radiation oncology.", "photo-1516549655169-df83a0774514", ["Imaging", "Diagnostics", "X-Ray"]),
        ("9", "Dentistry", "Oral health, hygiene, and dental surgery.", "photo-1588776814546-1ffcf47267a5", ["Dental", "Clinic", "Surgery"]),
        ("10", "Emergency Medicine", "Immediate care for acute illnesses and injuries.", "photo-1587350859728-117699f4a1ec", ["ER", "Critical Care", "Hospital"]),
        ("11", "Ophthalmology", "Vision care and treatment of eye disorders.", "photo-1576086213369-97a306d36557", ["Vision", "Specialist", "Surgery"]),
        ("12", "Gastroenterology", "Digestive system and abdominal health.", "photo-1579154341098-e4e158cc7f55", ["Digestive", "Specialist", "Internal"]),
        ("13", "Physical Therapy", "Rehabilitation and movement disorders treatment.", "photo-1576091160399-112ba8d25d1d", ["Rehab", "Movement", "Physical Therapy"]),
        ("14", "Pulmonology", "Respiratory system and lung health specialists.", "photo-1559757148-5c350d0d3c56", ["Lungs", "Internal", "Hospital"]),
    ];

    rows.iter()
        .map(|(id, name, desc, photo, tags)| Category::new(id, name, desc, &unsplash(photo), tags))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_only_tags_are_a_facet() {
        let category = &default_catalog()[0];
        assert_eq!(category.facet("tags"), Some(FacetValue::Tags(&category.tags)));
        assert_eq!(category.facet("name"), None);
    }

    #[test]
    fn test_default_catalog_ids_are_unique() {
        let catalog = default_catalog();
        assert_eq!(catalog.len(), 14);
        let ids: BTreeSet<_> = catalog.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert!(catalog[0]
            .image
            .as_deref()
            .is_some_and(|url| url.starts_with("https://images.unsplash.com/")));
    }

    #[test]
    fn test_all_tags_sorted_and_unique() {
        let tags = all_tags(&default_catalog());
        assert_eq!(tags.first().map(String::as_str), Some("Bones"));
        assert_eq!(tags.iter().filter(|t| *t == "Surgery").count(), 1);
        let mut sorted = tags.clone();
        sorted.sort();
        assert_eq!(tags, sorted);
    }

    #[test]
    fn test_load_catalog_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "categories:\n  - id: a\n    name: Nursing\n    desc: Ward care\n    tags: [Hospital]\n"
        )
        .unwrap();

        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].image, None);
    }

    #[test]
    fn test_load_catalog_rejects_duplicate_ids() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "categories:\n  - {{id: a, name: A, desc: x}}\n  - {{id: a, name: B, desc: y}}\n"
        )
        .unwrap();

        assert!(load_catalog(file.path()).is_err());
    }
}
