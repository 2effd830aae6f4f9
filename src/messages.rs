//! User-facing messages
//!
//! Renders quota rejections in the configured language. The Turkish strings
//! are kept byte-for-byte so existing clients matching on them keep working.

use serde::Deserialize;

use crate::quota::{QuotaRejection, format_mb};

/// Language of rejection messages
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Tr,
}

impl Locale {
    /// Render a quota rejection for the uploading user.
    pub fn render(&self, rejection: &QuotaRejection) -> String {
        match (self, rejection) {
            (Locale::En, QuotaRejection::NotDirectoryUser) => {
                "You are not a directory user. Upload is not allowed.".to_string()
            }
            (Locale::Tr, QuotaRejection::NotDirectoryUser) => {
                "Ldap kullanıcısı değilsiniz. Yükleme yapılamaz.".to_string()
            }
            (Locale::En, QuotaRejection::ServiceUnreachable) => {
                "Quota service is not responding.".to_string()
            }
            (Locale::Tr, QuotaRejection::ServiceUnreachable) => {
                "Kota servisi yanıt vermiyor.".to_string()
            }
            (
                Locale::En,
                QuotaRejection::Exceeded {
                    uploaded_mb,
                    available_mb,
                },
            ) => format!(
                "Quota limit exceeded. The uploaded file is {} MB, but only {} MB of disk space is available",
                format_mb(*uploaded_mb),
                format_mb(*available_mb)
            ),
            (
                Locale::Tr,
                QuotaRejection::Exceeded {
                    uploaded_mb,
                    available_mb,
                },
            ) => format!(
                "Kota limitini aştınız. Yüklediğiniz dosya {} MB boyutunda, fakat {} MB kullanılabilir disk alanınız var",
                format_mb(*uploaded_mb),
                format_mb(*available_mb)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turkish_exceeded_message() {
        let rejection = QuotaRejection::Exceeded {
            uploaded_mb: 0.586,
            available_mb: 0.488,
        };
        assert_eq!(
            Locale::Tr.render(&rejection),
            "Kota limitini aştınız. Yüklediğiniz dosya 0.586 MB boyutunda, fakat 0.488 MB kullanılabilir disk alanınız var"
        );
    }

    #[test]
    fn test_whole_numbers_print_without_fraction() {
        let rejection = QuotaRejection::Exceeded {
            uploaded_mb: 2.0,
            available_mb: 1.5,
        };
        let message = Locale::En.render(&rejection);
        assert!(message.contains(" 2 MB"));
        assert!(message.contains(" 1.5 MB"));
    }

    #[test]
    fn test_default_locale_is_english() {
        assert_eq!(
            Locale::default().render(&QuotaRejection::ServiceUnreachable),
            "Quota service is not responding."
        );
    }
}
