//! Product catalog loaded once from a JSON file at startup.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{errors::Error, Result};

/// Separator used inside callback tokens (`product_<id>`, `buy_<id>`).
pub const TOKEN_SEPARATOR: char = '_';

/// Telegram limits callback data to 64 bytes.
pub const MAX_CALLBACK_DATA_LEN: usize = 64;

/// Telegram limits media captions to 1024 characters.
pub const MAX_CAPTION_LEN: usize = 1024;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub photo: String,
    pub link: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Catalog {
    pub banner: String,
    pub welcome_text: String,
    pub products: Vec<Product>,
}

/// Where an image lives: a local file or a remote URL Telegram fetches itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaRef {
    File(PathBuf),
    Url(String),
}

impl MediaRef {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::Url(raw.to_string())
        } else {
            Self::File(PathBuf::from(raw))
        }
    }
}

impl Catalog {
    /// Read and validate the catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read catalog {}: {e}", path.display()))
        })?;
        let mut catalog = Self::from_json(&txt)
            .map_err(|e| Error::Config(format!("invalid catalog {}: {e}", path.display())))?;

        // Relative image paths are relative to the catalog file, not the working directory.
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        catalog.resolve_media(base);
        for warning in catalog.warnings() {
            tracing::warn!("catalog: {warning}");
        }

        tracing::info!(
            products = catalog.products.len(),
            path = %path.display(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_json(txt: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(txt)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn find_product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for p in &self.products {
            if p.id.is_empty() {
                return Err(Error::Config(format!("product {:?} has an empty id", p.name)));
            }
            if p.id.contains(TOKEN_SEPARATOR) {
                return Err(Error::Config(format!(
                    "product id {:?} must not contain '{TOKEN_SEPARATOR}'",
                    p.id
                )));
            }
            // `product_` is the longest token prefix.
            if "product_".len() + p.id.len() > MAX_CALLBACK_DATA_LEN {
                return Err(Error::Config(format!(
                    "product id {:?} is too long for callback data",
                    p.id
                )));
            }
            if !seen.insert(p.id.as_str()) {
                return Err(Error::Config(format!("duplicate product id {:?}", p.id)));
            }
        }
        Ok(())
    }

    fn resolve_media(&mut self, base: &Path) {
        let resolve = |raw: &mut String| {
            if let MediaRef::File(p) = MediaRef::parse(raw) {
                if p.is_relative() {
                    *raw = base.join(p).to_string_lossy().into_owned();
                }
            }
        };
        resolve(&mut self.banner);
        for p in &mut self.products {
            resolve(&mut p.photo);
        }
    }

    /// Non-fatal problems: missing image files and captions Telegram would reject.
    fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();

        let mut check_media = |what: &str, raw: &str| {
            if let MediaRef::File(p) = MediaRef::parse(raw) {
                if !p.exists() {
                    out.push(format!("{what} image {raw:?} not found"));
                }
            }
        };
        check_media("banner", &self.banner);
        for p in &self.products {
            check_media(&format!("product {}", p.id), &p.photo);
        }

        if self.welcome_text.chars().count() > MAX_CAPTION_LEN {
            out.push("welcome_text exceeds the caption limit".to_string());
        }
        for p in &self.products {
            let len = p.name.chars().count()
                + p.description.chars().count()
                + p.price.chars().count();
            if len > MAX_CAPTION_LEN {
                out.push(format!("product {} caption exceeds the caption limit", p.id));
            }
        }
        out
    }
}
