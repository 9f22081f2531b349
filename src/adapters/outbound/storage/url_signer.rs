//! SAS-style signed read URLs.
//!
//! The signature covers the HTTP method, the storage key, the validity
//! window, the read-only permission marker, and the optional
//! content-disposition override, so none of them can be altered without
//! invalidating the URL. The validity start is backdated five minutes to
//! absorb clock drift between issuer and consumer; the expiry is always
//! `now + ttl` from the moment of generation.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration as TimeDelta, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use http::Method;
use sha2::Sha256;

use crate::{
    domain::{errors::StoreResult, value_objects::StorageKey},
    ports::storage::SignReadRequest,
};

type HmacSha256 = Hmac<Sha256>;

const START_SKEW_MINUTES: i64 = 5;

/// Issues and verifies signed read URLs for blobs under one public base URL
#[derive(Clone)]
pub struct UrlSigner {
    base_url: String,
    secret: Vec<u8>,
}

impl UrlSigner {
    pub fn new(base_url: impl Into<String>, secret: impl Into<Vec<u8>>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            secret: secret.into(),
        }
    }

    /// Unsigned, permanent URL of a blob
    pub fn public_url(&self, key: &StorageKey) -> String {
        format!("{}/{}", self.base_url, key)
    }

    /// Sign a read URL valid from `now - 5min` until `now + ttl`
    pub fn sign_read(&self, request: &SignReadRequest) -> StoreResult<String> {
        Ok(self.sign_read_at(request, Utc::now()))
    }

    /// Clock-injectable variant of [`UrlSigner::sign_read`] used by expiry
    /// tests
    pub fn sign_read_at(&self, request: &SignReadRequest, now: DateTime<Utc>) -> String {
        let start = now - TimeDelta::minutes(START_SKEW_MINUTES);
        let expiry = TimeDelta::from_std(request.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let st = start.to_rfc3339_opts(SecondsFormat::Secs, true);
        let se = expiry.to_rfc3339_opts(SecondsFormat::Secs, true);
        let disposition = content_disposition(request);

        let sig = self.signature(request.key.as_str(), &st, &se, disposition.as_deref());

        let mut url = format!(
            "{}?sp=r&st={}&se={}",
            self.public_url(&request.key),
            urlencoding::encode(&st),
            urlencoding::encode(&se),
        );
        if let Some(disposition) = &disposition {
            url.push_str("&rscd=");
            url.push_str(&urlencoding::encode(disposition));
        }
        url.push_str("&sig=");
        url.push_str(&sig);
        url
    }

    /// Check that a previously issued URL grants access for `method` at
    /// instant `now`
    pub fn verify_read(&self, url: &str, method: &Method, now: DateTime<Utc>) -> bool {
        if *method != Method::GET {
            return false;
        }

        let Some((location, query)) = url.split_once('?') else {
            return false;
        };
        let Some(key) = location.strip_prefix(&format!("{}/", self.base_url)) else {
            return false;
        };

        let mut sp = None;
        let mut st = None;
        let mut se = None;
        let mut rscd = None;
        let mut sig = None;
        for pair in query.split('&') {
            let Some((name, value)) = pair.split_once('=') else {
                return false;
            };
            let Ok(value) = urlencoding::decode(value) else {
                return false;
            };
            match name {
                "sp" => sp = Some(value.into_owned()),
                "st" => st = Some(value.into_owned()),
                "se" => se = Some(value.into_owned()),
                "rscd" => rscd = Some(value.into_owned()),
                "sig" => sig = Some(value.into_owned()),
                _ => return false,
            }
        }
        let (Some(sp), Some(st), Some(se), Some(sig)) = (sp, st, se, sig) else {
            return false;
        };
        if sp != "r" {
            return false;
        }

        let expected = self.signature(key, &st, &se, rscd.as_deref());
        if expected != sig {
            return false;
        }

        let (Ok(start), Ok(expiry)) = (
            DateTime::parse_from_rfc3339(&st),
            DateTime::parse_from_rfc3339(&se),
        ) else {
            return false;
        };

        now >= start && now <= expiry
    }

    fn signature(&self, key: &str, st: &str, se: &str, rscd: Option<&str>) -> String {
        let canonical = format!(
            "GET\n{}\n{}\n{}\nr\n{}",
            key,
            st,
            se,
            rscd.unwrap_or_default()
        );
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("hmac accepts keys of any length");
        mac.update(canonical.as_bytes());
        URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes())
    }
}

fn content_disposition(request: &SignReadRequest) -> Option<String> {
    request.download_filename.as_ref().map(|name| {
        if request.inline {
            format!("inline; filename=\"{}\"", name)
        } else {
            format!("attachment; filename=\"{}\"", name)
        }
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn signer() -> UrlSigner {
        UrlSigner::new("https://blobs.example.com/catalogos", b"test-secret".to_vec())
    }

    fn request(ttl_secs: u64) -> SignReadRequest {
        SignReadRequest {
            key: StorageKey::new("posters/dune/1700000000000.jpg".to_string()).unwrap(),
            ttl: Duration::from_secs(ttl_secs),
            inline: true,
            download_filename: Some("dune.jpg".to_string()),
        }
    }

    #[test]
    fn test_signed_url_round_trip() {
        let signer = signer();
        let now = Utc::now();
        let url = signer.sign_read_at(&request(1800), now);

        assert!(url.starts_with(
            "https://blobs.example.com/catalogos/posters/dune/1700000000000.jpg?sp=r&st="
        ));
        assert!(signer.verify_read(&url, &Method::GET, now));
    }

    #[test]
    fn test_read_only() {
        let signer = signer();
        let now = Utc::now();
        let url = signer.sign_read_at(&request(1800), now);

        assert!(!signer.verify_read(&url, &Method::PUT, now));
        assert!(!signer.verify_read(&url, &Method::DELETE, now));
    }

    #[test]
    fn test_expiry_window() {
        let signer = signer();
        let now = Utc::now();
        let url = signer.sign_read_at(&request(1800), now);

        // Valid through the whole window, including the backdated start
        assert!(signer.verify_read(&url, &Method::GET, now + TimeDelta::seconds(1799)));
        assert!(signer.verify_read(&url, &Method::GET, now - TimeDelta::minutes(4)));

        // Invalid past expiry and before the skewed start
        assert!(!signer.verify_read(&url, &Method::GET, now + TimeDelta::seconds(1801)));
        assert!(!signer.verify_read(&url, &Method::GET, now - TimeDelta::minutes(6)));
    }

    #[test]
    fn test_tampered_url_rejected() {
        let signer = signer();
        let now = Utc::now();
        let url = signer.sign_read_at(&request(1800), now);

        let other_key = url.replace("dune", "tenet");
        assert!(!signer.verify_read(&other_key, &Method::GET, now));

        // Stretching the expiry breaks the signature
        let stretched = url.replace("se=", "se=2999");
        assert!(!signer.verify_read(&stretched, &Method::GET, now));
    }

    #[test]
    fn test_disposition_modes() {
        let signer = signer();
        let now = Utc::now();

        let mut req = request(60);
        req.inline = false;
        let url = signer.sign_read_at(&req, now);
        assert!(url.contains(&urlencoding::encode("attachment; filename=\"dune.jpg\"").into_owned()));

        req.download_filename = None;
        let url = signer.sign_read_at(&req, now);
        assert!(!url.contains("rscd="));
        assert!(signer.verify_read(&url, &Method::GET, now));
    }
}
