//! HTTP request building.

/// Browser request headers sent with every page fetch.
///
/// The portal serves different markup to clients that do not look like a
/// desktop browser, so every request carries the same Chrome-like header set
/// plus a referer pointing at the homepage.
pub(crate) struct RequestHeaders;

impl RequestHeaders {
    pub(crate) const ACCEPT: &'static str =
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
    pub(crate) const ACCEPT_LANGUAGE: &'static str = "zh-CN,zh;q=0.9,en;q=0.8";
    pub(crate) const REFERER: &'static str = "https://www.bilibili.com/";

    /// Applies the browser headers, and the cookie when one is configured, to a
    /// `reqwest::RequestBuilder`.
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
        cookie: &str,
    ) -> reqwest::RequestBuilder {
        let builder = builder
            .header(reqwest::header::ACCEPT, Self::ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, Self::ACCEPT_LANGUAGE)
            .header(reqwest::header::CONNECTION, "keep-alive")
            .header(reqwest::header::REFERER, Self::REFERER);

        if cookie.is_empty() {
            builder
        } else {
            builder.header(reqwest::header::COOKIE, cookie)
        }
    }
}
