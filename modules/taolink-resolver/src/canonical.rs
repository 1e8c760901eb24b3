//! Product link canonicalization.
//!
//! Collapses the many historical taobao link shapes (mobile subdomains, app
//! deep links, tracking-parameter variants) into one stable form. The first
//! matching special case wins; everything else just loses its tracking
//! parameters. Canonicalization is idempotent.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{ResolveError, Result};

static MOBILE_SHOP_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^shop(\d+)\.m\.taobao\.com$").unwrap());

static APP_ITEM_PATH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^/i(\d+)\.htm").unwrap());

static TRACK_QUERY_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(x_|wh_|uth_|source|bft|hm_)").unwrap());

/// Known tracking parameter names, stripped wherever they appear.
const TRACK_QUERY_NAMES: &[&str] = &[
    "abtest",
    "acm",
    "alg_bts",
    "algArgs",
    "app",
    "appid",
    "cat",
    "cps",
    "from",
    "impid",
    "initiative_id",
    "lwfrom",
    "lygClk",
    "pos",
    "ppath",
    "pvid",
    "rpos",
    "scene",
    "scm",
    "share_crt_v",
    "short_name",
    "spm",
    "ssid",
    "stats_click",
    "t_trace_id",
    "trackInfo",
    "uid",
    "un",
    "utparam",
];

const COUPON_HOST: &str = "uland.taobao.com";
const MOBILE_SEARCH_HOST: &str = "s.m.taobao.com";
const APP_LINK_HOST: &str = "a.m.taobao.com";

/// Canonical product-page hosts. The chat adapter renders a full reply only
/// for links that land on one of these.
pub fn is_product_page(url: &str) -> bool {
    Url::parse(url)
        .ok()
        .and_then(|u| {
            u.host_str()
                .map(|h| h == "item.taobao.com" || h == "detail.tmall.com")
        })
        .unwrap_or(false)
}

/// Rewrite a raw absolute product URL into its canonical form.
pub fn canonicalize(raw: &str) -> Result<String> {
    let url = Url::parse(raw)
        .map_err(|e| ResolveError::Network(format!("invalid product link {raw}: {e}")))?;
    let host = url.host_str().unwrap_or_default().to_string();

    // Mobile shop page: swap to the desktop shop host. Shop-page queries
    // carry nothing canonical, so they are dropped along the way.
    if let Some(caps) = MOBILE_SHOP_HOST_RE.captures(&host) {
        let mut out = url.clone();
        out.set_host(Some(&format!("shop{}.taobao.com", &caps[1])))
            .map_err(|e| ResolveError::Network(format!("invalid shop host rewrite: {e}")))?;
        out.set_query(None);
        return Ok(out.to_string());
    }

    // Coupon redirect: the `e` parameter is the coupon itself, everything
    // else is tracking.
    if host == COUPON_HOST && url.path() == "/coupon/edetail" {
        if let Some(e) = query_param(&url, "e") {
            let mut out = Url::parse("https://uland.taobao.com/coupon/edetail")
                .expect("static URL parses");
            out.query_pairs_mut().append_pair("e", &e);
            return Ok(out.to_string());
        }
    }

    // Mobile search: carry the query over to the desktop search path.
    if host == MOBILE_SEARCH_HOST {
        if let Some(q) = query_param(&url, "q") {
            let mut out = Url::parse("https://s.taobao.com/search").expect("static URL parses");
            out.query_pairs_mut().append_pair("q", &q);
            return Ok(out.to_string());
        }
    }

    // App deep link: the item id lives in the path, not the query.
    if host == APP_LINK_HOST {
        if let Some(caps) = APP_ITEM_PATH_RE.captures(url.path()) {
            return Ok(item_page(&host, &caps[1]));
        }
    }

    // Anything carrying an item id collapses to the platform item page.
    if let Some(id) = query_param(&url, "id") {
        return Ok(item_page(&host, &id));
    }

    let mut out = url;
    strip_tracking_params(&mut out);
    Ok(out.to_string())
}

/// Build the canonical item page for an id, choosing the platform by the
/// original host.
fn item_page(host: &str, id: &str) -> String {
    let platform = if host.contains("tmall") {
        "detail.tmall.com"
    } else {
        "item.taobao.com"
    };
    let mut out =
        Url::parse(&format!("https://{platform}/item.htm")).expect("static URL parses");
    out.query_pairs_mut().append_pair("id", id);
    out.to_string()
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.into_owned())
}

fn is_tracking_param(name: &str) -> bool {
    TRACK_QUERY_NAMES.contains(&name) || TRACK_QUERY_PREFIX_RE.is_match(name)
}

fn strip_tracking_params(url: &mut Url) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(name, _)| !is_tracking_param(name))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
        return;
    }

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    for (name, value) in &kept {
        pairs.append_pair(name, value);
    }
}
