//! Option catalog for the fitting room
//!
//! Every selectable value lives here as `'static` data. Customization state
//! only ever stores references into these tables, so a selection can never
//! drift outside its catalog.

use std::fmt;

/// A collar pattern offered by the tailor, with a reference photo.
#[derive(Debug, Clone, Copy, Eq)]
pub struct CollarDesign {
    pub name: &'static str,
    pub image_url: &'static str,
}

// Collar identity is the name; the reference URL is presentation detail.
impl PartialEq for CollarDesign {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

pub const FITS: [&str; 3] = ["Slim Fit", "Regular Fit", "Comfort Fit"];

pub const COLORS: [&str; 6] = [
    "Sky Blue",
    "Pure White",
    "Eggshell White",
    "Mint Green",
    "Pastel Pink",
    "Light Cream",
];

pub const FABRICS: [&str; 4] = [
    "Crisp Cotton Poplin",
    "Soft Linen Blend",
    "Egyptian Cotton",
    "Chambray",
];

pub static COLLAR_DESIGNS: [CollarDesign; 4] = [
    CollarDesign {
        name: "Brown Gemoetrical",
        image_url: "https://res.cloudinary.com/de0cllasz/image/upload/v1762578471/saya-kurta_opq6hv.png",
    },
    CollarDesign {
        name: "Goldern Floran",
        image_url: "https://res.cloudinary.com/de0cllasz/image/upload/v1762578464/images_2_a5jj1i.jpg",
    },
    CollarDesign {
        name: "Pastel Lines",
        image_url: "https://res.cloudinary.com/de0cllasz/image/upload/v1762578464/images_1_qcmnry.jpg",
    },
    CollarDesign {
        name: "Golden Geometrical with Paan",
        image_url: "https://res.cloudinary.com/de0cllasz/image/upload/v1762578464/images_3_svm4ds.jpg",
    },
];

/// Status lines cycled by the result panel while a generation is running.
pub const LOADING_MESSAGES: [&str; 6] = [
    "Tailoring your virtual garment...",
    "Adjusting the fit and drape...",
    "Applying realistic fabric textures...",
    "Perfecting the lighting and shadows...",
    "Stitching the final details...",
    "Almost ready for your fitting...",
];

/// Interval between loading-message rotations, in milliseconds.
pub const LOADING_MESSAGE_INTERVAL_MS: u64 = 2500;

/// MIME types the file input surface accepts, keyed by file extension.
pub const ACCEPTED_IMAGE_TYPES: [(&str, &str); 4] = [
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
];

/// The four independent customization dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Fit,
    Color,
    Fabric,
    Collar,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Fit,
        Dimension::Color,
        Dimension::Fabric,
        Dimension::Collar,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Fit => "Fit",
            Dimension::Color => "Color",
            Dimension::Fabric => "Fabric",
            Dimension::Collar => "Collar Design",
        }
    }

    /// Display names of every catalog entry for this dimension, in order.
    pub fn entries(&self) -> Vec<&'static str> {
        match self {
            Dimension::Fit => FITS.to_vec(),
            Dimension::Color => COLORS.to_vec(),
            Dimension::Fabric => FABRICS.to_vec(),
            Dimension::Collar => COLLAR_DESIGNS.iter().map(|c| c.name).collect(),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            Dimension::Fit => FITS.len(),
            Dimension::Color => COLORS.len(),
            Dimension::Fabric => FABRICS.len(),
            Dimension::Collar => COLLAR_DESIGNS.len(),
        }
    }

    pub fn next(&self) -> Dimension {
        let idx = Self::ALL.iter().position(|d| d == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Dimension {
        let idx = Self::ALL.iter().position(|d| d == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a name given on the command line is not in its catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {dimension} '{value}' (choose one of: {})", .valid.join(", "))]
pub struct CatalogError {
    pub dimension: Dimension,
    pub value: String,
    pub valid: Vec<&'static str>,
}

/// Case-insensitive catalog lookup returning the entry's index.
pub fn position_of(dimension: Dimension, name: &str) -> Result<usize, CatalogError> {
    let wanted = name.trim();
    let entries = dimension.entries();
    entries
        .iter()
        .position(|entry| entry.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| CatalogError {
            dimension,
            value: wanted.to_string(),
            valid: entries.clone(),
        })
}

/// Look up the MIME type for a file extension, if the picker accepts it.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    ACCEPTED_IMAGE_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collar_identity_is_name() {
        let a = CollarDesign {
            name: "Pastel Lines",
            image_url: "https://example.com/a.jpg",
        };
        assert_eq!(a, COLLAR_DESIGNS[2]);
    }

    #[test]
    fn test_dimension_cycle_wraps() {
        assert_eq!(Dimension::Collar.next(), Dimension::Fit);
        assert_eq!(Dimension::Fit.previous(), Dimension::Collar);
    }

    #[test]
    fn test_position_of_is_case_insensitive() {
        assert_eq!(position_of(Dimension::Color, "mint green").unwrap(), 3);
        assert_eq!(position_of(Dimension::Collar, " Pastel Lines ").unwrap(), 2);
    }

    #[test]
    fn test_position_of_lists_valid_values() {
        let err = position_of(Dimension::Fabric, "Silk").unwrap_err();
        assert_eq!(err.value, "Silk");
        assert!(err.to_string().contains("Chambray"));
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(mime_for_extension("webp"), Some("image/webp"));
        assert_eq!(mime_for_extension("gif"), None);
    }
}
