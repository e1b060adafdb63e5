// crawl/domain.rs — registrable-domain (eTLD+1) comparison.

use url::Url;

/// True iff both URLs share a registrable domain.
///
/// Public-suffix aware: `news.bbc.co.uk` and `shop.bbc.co.uk` both
/// register as `bbc.co.uk`, while `a.co.uk` and `b.co.uk` do not match.
/// Any parse failure on either side is fail-closed: `false`, never an
/// error.
pub fn same_domain(a: &str, b: &str) -> bool {
    match (registrable_domain(a), registrable_domain(b)) {
        (Some(da), Some(db)) => da == db,
        _ => false,
    }
}

fn registrable_domain(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?;
    psl::domain_str(host).map(|d| d.to_string())
}
