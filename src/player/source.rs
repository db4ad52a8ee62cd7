use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::PlayerError;

/// Characters escaped in query values we write
const QUERY_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?');

/// A stream quality label as the byte server understands it ("360", "720p", "hd720", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quality(String);

impl Quality {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into().trim().to_string())
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// Vertical resolution this label stands for, if recognizable
    pub fn height(&self) -> Option<u32> {
        let s = self.0.to_lowercase();
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        if let Ok(h) = digits.parse::<u32>() {
            return Some(h);
        }
        match s.as_str() {
            "tiny" => Some(144),
            "small" => Some(240),
            "medium" => Some(360),
            "large" => Some(480),
            "hd" => Some(720),
            _ => None,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transcode target. `Default` streams whatever the server picks and is
/// never written to the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    #[default]
    Default,
    Mpeg4,
    H263,
}

impl Codec {
    pub const ALL: [Codec; 3] = [Codec::Default, Codec::Mpeg4, Codec::H263];

    /// Query value, `None` for the default codec
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            Codec::Default => None,
            Codec::Mpeg4 => Some("mpeg4"),
            Codec::H263 => Some("h263"),
        }
    }
}

impl FromStr for Codec {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "default" => Ok(Codec::Default),
            "mpeg4" => Ok(Codec::Mpeg4),
            "h263" => Ok(Codec::H263),
            other => Err(PlayerError::InvalidSource(format!("unsupported codec '{}'", other))),
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query_value().unwrap_or("default"))
    }
}

/// A media source URL split into the part we keep and the selection we append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    path: String,
    params: Vec<String>,
    fragment: Option<String>,
    pub quality: Quality,
    pub codec: Codec,
}

impl SourceDescriptor {
    /// Parse `src`, dropping any `quality`/`codec` parameters it already carries.
    pub fn new(src: &str, quality: Quality, codec: Codec) -> Self {
        let (without_fragment, fragment) = match src.split_once('#') {
            Some((head, frag)) => (head, Some(frag.to_string())),
            None => (src, None),
        };
        let (path, query) = match without_fragment.split_once('?') {
            Some((path, query)) => (path, query),
            None => (without_fragment, ""),
        };

        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .filter(|pair| {
                let key = pair.split('=').next().unwrap_or_default();
                let key = percent_decode_str(key).decode_utf8_lossy();
                key != "quality" && key != "codec"
            })
            .map(str::to_string)
            .collect();

        Self {
            path: path.to_string(),
            params,
            fragment,
            quality,
            codec,
        }
    }

    /// Rewrite `src` for the given selection in one step
    pub fn rebuild(src: &str, quality: &Quality, codec: Codec) -> String {
        Self::new(src, quality.clone(), codec).to_url()
    }

    pub fn to_url(&self) -> String {
        let mut params = self.params.clone();
        params.push(format!(
            "quality={}",
            utf8_percent_encode(self.quality.label(), QUERY_VALUE)
        ));
        if let Some(codec) = self.codec.query_value() {
            params.push(format!("codec={}", codec));
        }

        let mut url = format!("{}?{}", self.path, params.join("&"));
        if let Some(fragment) = &self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}
