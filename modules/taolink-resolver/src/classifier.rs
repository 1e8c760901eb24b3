use std::sync::LazyLock;

use regex::Regex;

use crate::types::{CandidateCode, CodeKind};

/// Taokouling token flanked by currency/decorative symbols. Real messages
/// usually wrap the code in a leading digit and trailing promo text, but the
/// bare `¥token¥` form circulates too, so only the delimiters are required.
static SYMBOL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[¥￥$€£₤¢]([0-9A-Za-z]{10,15})[¥￥$€£₤¢]").unwrap());

/// `m.tb.cn` shortlink code, e.g. `m.tb.cn/h.AbCdEfG`.
static SHORTLINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"m\.tb\.cn/([0-9A-Za-z.]{5,15})").unwrap());

/// Classify message text against both candidate patterns. The patterns are
/// independent and not mutually exclusive: zero, one, or two candidates come
/// back, each to be pursued as its own strategy. Absent text (e.g. a photo
/// without a caption) classifies to nothing.
pub fn classify(text: Option<&str>) -> Vec<CandidateCode> {
    let Some(text) = text else {
        return Vec::new();
    };

    let mut candidates = Vec::new();

    if let Some(caps) = SYMBOL_CODE_RE.captures(text) {
        candidates.push(CandidateCode {
            kind: CodeKind::SymbolEmbedded,
            token: caps[1].to_string(),
        });
    }

    if let Some(caps) = SHORTLINK_RE.captures(text) {
        candidates.push(CandidateCode {
            kind: CodeKind::Shortlink,
            token: caps[1].to_string(),
        });
    }

    candidates
}
