//! Key namespaces and their lifecycle rules
//!
//! Every stored object lives under exactly one namespace, and every namespace
//! carries one immutable [`LifecycleRule`] defined at compile time. The
//! namespace string is the leading segment of every object key and is
//! wire-stable: anything persisting keys depends on these prefixes.

use strum::{Display, EnumIter};

const MIB: u64 = 1024 * 1024;
const DAY_SECS: u64 = 24 * 60 * 60;

/// Static per-namespace storage policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleRule {
    /// Hard ceiling on object size in bytes
    pub max_file_size: u64,
    /// Intended retention window in seconds
    ///
    /// Advisory: enforced by the bucket's lifecycle configuration, never
    /// checked at runtime by this crate.
    pub max_age_secs: u64,
    /// MIME types acceptable for uploads into this namespace
    pub allowed_content_types: &'static [&'static str],
    /// Key extensions acceptable for this namespace
    pub allowed_extensions: &'static [&'static str],
}

const RAW: LifecycleRule = LifecycleRule {
    max_file_size: 50 * MIB,
    max_age_secs: 30 * DAY_SECS,
    allowed_content_types: &[
        "image/jpeg",
        "image/png",
        "image/webp",
        "image/heic",
        "video/mp4",
        "video/quicktime",
    ],
    allowed_extensions: &["jpg", "jpeg", "png", "webp", "heic", "mp4", "mov"],
};

const STAGED: LifecycleRule = LifecycleRule {
    max_file_size: 25 * MIB,
    max_age_secs: 365 * DAY_SECS,
    allowed_content_types: &["image/jpeg", "image/png", "image/webp"],
    allowed_extensions: &["jpg", "jpeg", "png", "webp"],
};

const THUMBNAIL: LifecycleRule = LifecycleRule {
    max_file_size: 2 * MIB,
    max_age_secs: 365 * DAY_SECS,
    allowed_content_types: &["image/jpeg", "image/webp"],
    allowed_extensions: &["jpg", "jpeg", "webp"],
};

const BUNDLE: LifecycleRule = LifecycleRule {
    max_file_size: 25 * MIB,
    max_age_secs: 365 * DAY_SECS,
    allowed_content_types: &["image/jpeg", "image/png", "image/webp"],
    allowed_extensions: &["jpg", "jpeg", "png", "webp"],
};

// QR codes are rendered server-side as PNG, nothing else is valid here.
const QR_CODE: LifecycleRule = LifecycleRule {
    max_file_size: MIB,
    max_age_secs: 365 * DAY_SECS,
    allowed_content_types: &["image/png"],
    allowed_extensions: &["png"],
};

const TEMP: LifecycleRule = LifecycleRule {
    max_file_size: 50 * MIB,
    max_age_secs: DAY_SECS,
    allowed_content_types: &[
        "image/jpeg",
        "image/png",
        "image/webp",
        "image/heic",
        "video/mp4",
        "video/quicktime",
    ],
    allowed_extensions: &["jpg", "jpeg", "png", "webp", "heic", "mp4", "mov"],
};

const ARCHIVE: LifecycleRule = LifecycleRule {
    max_file_size: 100 * MIB,
    max_age_secs: 5 * 365 * DAY_SECS,
    allowed_content_types: &[
        "image/jpeg",
        "image/png",
        "image/webp",
        "video/mp4",
        "video/quicktime",
    ],
    allowed_extensions: &["jpg", "jpeg", "png", "webp", "mp4", "mov"],
};

/// Logical storage category for listing media
///
/// The `Display` serialization of each variant is its key prefix. Variant
/// order is the order [`delete sweeps`](crate::store::MediaStore::delete_all_for_item)
/// visit namespaces; each prefix is independent, so the order carries no
/// semantic weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Namespace {
    /// Seller uploads as received, before any processing
    #[strum(serialize = "prod/raw")]
    Raw,
    /// Processed media staged for the live listing
    #[strum(serialize = "prod/staged")]
    Staged,
    /// Dashboard and gallery thumbnails
    #[strum(serialize = "prod/thumbs")]
    Thumbnail,
    /// Multi-item bundle composites
    #[strum(serialize = "prod/bundles")]
    Bundle,
    /// Listing QR codes (PNG only)
    #[strum(serialize = "prod/qr")]
    QrCode,
    /// Short-lived scratch space
    #[strum(serialize = "prod/temp")]
    Temp,
    /// Long-term retention of sold-listing media
    #[strum(serialize = "prod/archive")]
    Archive,
}

impl Namespace {
    /// Returns the immutable lifecycle rule for this namespace
    #[must_use]
    pub const fn lifecycle_rule(self) -> &'static LifecycleRule {
        match self {
            Self::Raw => &RAW,
            Self::Staged => &STAGED,
            Self::Thumbnail => &THUMBNAIL,
            Self::Bundle => &BUNDLE,
            Self::QrCode => &QR_CODE,
            Self::Temp => &TEMP,
            Self::Archive => &ARCHIVE,
        }
    }

    /// Maximum object size in bytes for this namespace
    #[must_use]
    pub const fn max_file_size(self) -> u64 {
        self.lifecycle_rule().max_file_size
    }

    /// Whether `byte_size` fits this namespace's size ceiling
    ///
    /// Callers check the intended size with this before requesting an upload
    /// grant; the bucket's own policy is the backstop for what actually gets
    /// PUT.
    #[must_use]
    pub const fn validate_file_size(self, byte_size: u64) -> bool {
        byte_size <= self.max_file_size()
    }

    /// Whether `content_type` (a lowercase MIME essence such as `image/png`)
    /// is acceptable for this namespace
    #[must_use]
    pub fn allows_content_type(self, content_type: &str) -> bool {
        self.lifecycle_rule()
            .allowed_content_types
            .iter()
            .any(|allowed| *allowed == content_type)
    }

    /// Whether `extension` is acceptable for keys in this namespace
    #[must_use]
    pub fn allows_extension(self, extension: &str) -> bool {
        self.lifecycle_rule()
            .allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    }
}
