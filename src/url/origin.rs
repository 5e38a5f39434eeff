use url::Url;

/// Returns true if both URLs share scheme, host and port
///
/// Ports are compared after filling in the scheme's default, so
/// `https://example.com/` and `https://example.com:443/` are the same origin,
/// while `http://example.com/` and `https://example.com/` are not.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_corpus::url::same_origin;
///
/// let root = Url::parse("https://example.com/").unwrap();
/// assert!(same_origin(&root, &Url::parse("https://example.com/pricing").unwrap()));
/// assert!(!same_origin(&root, &Url::parse("http://example.com/pricing").unwrap()));
/// ```
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Builds the conventional `/sitemap.xml` location for a root URL
///
/// The sitemap always sits at the origin root, regardless of the path the
/// root URL points at.
pub fn sitemap_url(root: &Url) -> Url {
    let mut sitemap = root.clone();
    sitemap.set_path("/sitemap.xml");
    sitemap.set_query(None);
    sitemap.set_fragment(None);
    sitemap
}
