//! Share-intent links for social platforms.

use crate::destination::CanonicalDestination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialTarget {
    Facebook,
    Twitter,
    LinkedIn,
    WhatsApp,
    Email,
}

impl SocialTarget {
    pub const ALL: [SocialTarget; 5] = [
        SocialTarget::Facebook,
        SocialTarget::Twitter,
        SocialTarget::LinkedIn,
        SocialTarget::WhatsApp,
        SocialTarget::Email,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SocialTarget::Facebook => "Facebook",
            SocialTarget::Twitter => "Twitter",
            SocialTarget::LinkedIn => "LinkedIn",
            SocialTarget::WhatsApp => "WhatsApp",
            SocialTarget::Email => "Email",
        }
    }

    /// Parse a case-insensitive target name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|target| target.name().eq_ignore_ascii_case(name))
    }
}

/// Build the share-intent URL for `target`.
///
/// The destination is percent-encoded everywhere, including the email body,
/// where a raw `&` would end the body early.
pub fn share_link(target: SocialTarget, destination: &CanonicalDestination) -> String {
    let encoded = urlencoding::encode(destination.as_str());
    match target {
        SocialTarget::Facebook => {
            format!("https://www.facebook.com/sharer/sharer.php?u={encoded}")
        }
        SocialTarget::Twitter => format!(
            "https://twitter.com/intent/tweet?text={}&url={encoded}",
            urlencoding::encode("Check out this QR code")
        ),
        SocialTarget::LinkedIn => {
            format!("https://www.linkedin.com/sharing/share-offsite/?url={encoded}")
        }
        SocialTarget::WhatsApp => format!(
            "https://wa.me/?text={}{encoded}",
            urlencoding::encode("Check out this link: ")
        ),
        SocialTarget::Email => format!(
            "mailto:?subject={}&body={}{encoded}",
            urlencoding::encode("QR Code"),
            urlencoding::encode("Check out this link: ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::canonicalize;
    use rstest::rstest;

    #[rstest]
    #[case(
        SocialTarget::Facebook,
        "https://www.facebook.com/sharer/sharer.php?u=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"
    )]
    #[case(
        SocialTarget::Twitter,
        "https://twitter.com/intent/tweet?text=Check%20out%20this%20QR%20code&url=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"
    )]
    #[case(
        SocialTarget::LinkedIn,
        "https://www.linkedin.com/sharing/share-offsite/?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"
    )]
    #[case(
        SocialTarget::WhatsApp,
        "https://wa.me/?text=Check%20out%20this%20link%3A%20https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"
    )]
    #[case(
        SocialTarget::Email,
        "mailto:?subject=QR%20Code&body=Check%20out%20this%20link%3A%20https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"
    )]
    fn test_share_links(#[case] target: SocialTarget, #[case] expected: &str) {
        let destination = canonicalize("example.com/a?b=c").unwrap();
        assert_eq!(share_link(target, &destination), expected);
    }

    #[test]
    fn test_email_body_keeps_query_separators() {
        let destination = canonicalize("example.com/?a=1&b=2").unwrap();
        let link = share_link(SocialTarget::Email, &destination);
        let query = link.strip_prefix("mailto:?").unwrap();
        // Exactly the two mailto fields; the destination's '&' stays inside the body
        let fields: Vec<&str> = query.split('&').collect();
        assert_eq!(fields.len(), 2);
        let body = fields[1].strip_prefix("body=").unwrap();
        assert_eq!(
            urlencoding::decode(body).unwrap(),
            "Check out this link: https://example.com/?a=1&b=2"
        );
    }

    #[test]
    fn test_from_name() {
        assert_eq!(SocialTarget::from_name("linkedin"), Some(SocialTarget::LinkedIn));
        assert_eq!(SocialTarget::from_name("WhatsApp"), Some(SocialTarget::WhatsApp));
        assert_eq!(SocialTarget::from_name("myspace"), None);
    }
}
