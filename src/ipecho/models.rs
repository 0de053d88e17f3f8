/// Payload of the echo service. Extra fields (country, asn, ...) are ignored.
#[derive(serde::Deserialize)]
pub(super) struct EchoResponse {
    pub ip: String,
}
