use crate::StreamItem;

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The driver is about to issue the request.
    Started,
    /// One decoded item from the response stream.
    Item(StreamItem),
    /// The server refused the request before streaming began.
    Rejected {
        status: u16,
        /// The `error` field of the JSON body, if there was one.
        message: Option<String>,
    },
    /// The connection failed, either while opening or mid-stream.
    TransportFailed { reason: String },
    /// The transport signalled end of data.
    StreamEnded,
}
