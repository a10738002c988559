mod connectivity_port;
mod http_client_port;
mod image_decoder_port;
mod reading_context_port;
mod source_lookup_port;

pub use connectivity_port::ConnectivityPort;
pub use http_client_port::{
    BodyStream, COOKIE_JAR_HEADER, ClientProfile, HttpClientPort, HttpRequest, HttpResponse,
    collect_body,
};
pub use image_decoder_port::{DecodedImage, ImageDecoderPort};
pub use reading_context_port::ReadingContextPort;
pub use source_lookup_port::SourceLookupPort;
