/// Field slices cut out of a line by a [`LogFormat`](super::LogFormat) grammar.
///
/// Shapes are already checked (three-digit status, numeric or `-` size, three
/// token request line); typed coercion is left to the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFields<'a> {
    pub remote_addr: &'a str,
    pub remote_user: &'a str,
    pub time_local: &'a str,
    pub method: &'a str,
    pub path: &'a str,
    pub protocol: &'a str,
    pub status: &'a str,
    pub body_bytes_sent: &'a str,
    pub referrer: Option<&'a str>,
    pub user_agent: Option<&'a str>,
    pub upstream: Option<RawUpstreamFields<'a>>,
}

/// Extra fields of the extended (ingress controller) layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUpstreamFields<'a> {
    pub request_length: &'a str,
    pub request_time: &'a str,
    pub upstream_name: &'a str,
    pub upstream_addr_list: &'a str,
    pub upstream_addr: &'a str,
    pub upstream_response_length: &'a str,
    pub upstream_response_time: &'a str,
    pub upstream_status: &'a str,
    pub request_id: &'a str,
}
