//! Proxy message synthesizers.
//!
//! The relay loop never originates traffic, but the owning connection
//! handler sometimes must: to tell a client why it is being turned away,
//! or to pacify a backend whose connection-error bookkeeping would
//! otherwise count the proxy's own rejection as a failed handshake.
//!
//! Both synthesizers encode a well-formed frame and transmit it fully,
//! looping over partial writes until the whole frame is on the wire or a
//! write fails. The `route` argument names the routing rule on whose
//! behalf the frame is sent; it is only logged, never encoded.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::codec::{CapabilitiesGet, ServerError};
use crate::error::Result;
use crate::protocol::{build_frame, client_tag, server_tag};

/// Send a synthesized Error frame.
///
/// Used toward a client the proxy is rejecting (e.g. too many
/// connections, blocked host) before any backend is involved.
pub async fn notify_error<W>(
    sink: &mut W,
    code: u32,
    message: &str,
    sql_state: &str,
    route: &str,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let error = ServerError {
        code,
        msg: message.to_string(),
        sql_state: sql_state.to_string(),
    };
    let wire = build_frame(server_tag::ERROR, &error.encode());

    debug!(route, code, sql_state, "sending error notification");
    if let Err(e) = write_fully(sink, &wire).await {
        warn!(route, error = %e, "failed to send error notification");
        return Err(e);
    }
    Ok(())
}

/// Send a minimal CapabilitiesGet frame toward a server.
///
/// Sent when the proxy rejects a client before forwarding any bytes, so
/// the backend sees a harmless probe instead of an aborted handshake and
/// does not advance its connection-error counter for the proxy's address.
pub async fn probe_capabilities<W>(sink: &mut W, route: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let wire = build_frame(client_tag::CAPABILITIES_GET, &CapabilitiesGet.encode());

    debug!(route, "sending capability probe");
    if let Err(e) = write_fully(sink, &wire).await {
        warn!(route, error = %e, "failed to send capability probe");
        return Err(e);
    }
    Ok(())
}

/// Write the whole frame, retrying short writes until complete.
async fn write_fully<W>(sink: &mut W, frame: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    sink.write_all(frame).await?;
    sink.flush().await?;
    Ok(())
}
