//! Frame encoding and decoding.

use crate::WireError;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Width of the ASCII decimal length header.
pub const HEADER_LEN: usize = 4;

/// Largest body the header width can declare.
pub const MAX_BODY_LEN: usize = 9999;

/// Write one framed message: the length header followed by the body,
/// as one logical unit.
///
/// # Errors
///
/// [`WireError::FrameTooLarge`] when the body cannot be declared in
/// the header width; nothing is written in that case.
pub async fn write_frame<W>(writer: &mut W, body: &[u8]) -> Result<(), WireError>
where
    W: AsyncWrite + Unpin,
{
    if body.len() > MAX_BODY_LEN {
        return Err(WireError::FrameTooLarge {
            len: body.len(),
            max: MAX_BODY_LEN,
        });
    }
    // Decimal length left-aligned in the fixed-width field; the
    // decoder trims before parsing.
    let header = format!("{:<width$}", body.len(), width = HEADER_LEN);
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(body).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one framed message body.
///
/// Accumulates bytes until the declared length is satisfied.
///
/// # Errors
///
/// - [`WireError::ConnectionClosed`] when the channel closes before
///   the declared length is reached (or mid-header).
/// - [`WireError::BadHeader`] when the header is not a decimal number.
pub async fn read_frame<R>(reader: &mut R) -> Result<Vec<u8>, WireError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; HEADER_LEN];
    read_exact_or_closed(reader, &mut header).await?;

    let text = std::str::from_utf8(&header).map_err(|_| WireError::BadHeader {
        header: String::from_utf8_lossy(&header).into_owned(),
    })?;
    let len: usize = text.trim().parse().map_err(|_| WireError::BadHeader {
        header: text.to_string(),
    })?;

    let mut body = vec![0u8; len];
    read_exact_or_closed(reader, &mut body).await?;
    Ok(body)
}

/// Serialize `message` as JSON and write it as one frame.
pub async fn write_message<W>(writer: &mut W, message: &Value) -> Result<(), WireError>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_vec(message)?;
    write_frame(writer, &body).await
}

/// Read one frame and parse its body as JSON.
pub async fn read_message<R>(reader: &mut R) -> Result<Value, WireError>
where
    R: AsyncRead + Unpin,
{
    let body = read_frame(reader).await?;
    Ok(serde_json::from_slice(&body)?)
}

async fn read_exact_or_closed<R>(reader: &mut R, buf: &mut [u8]) -> Result<(), WireError>
where
    R: AsyncRead + Unpin,
{
    match reader.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(WireError::ConnectionClosed),
        Err(e) => Err(WireError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn round_trip() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        let message = json!({"request": "calc_intents", "query": "what time is it"});

        write_message(&mut client, &message).await.unwrap();
        let read = read_message(&mut server).await.unwrap();
        assert_eq!(read, message);
    }

    #[tokio::test]
    async fn zero_length_body() {
        let (mut client, mut server) = tokio::io::duplex(64);
        write_frame(&mut client, b"").await.unwrap();
        let body = read_frame(&mut server).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn several_frames_in_sequence() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        for payload in [&b"first"[..], &b""[..], &b"third frame"[..]] {
            write_frame(&mut client, payload).await.unwrap();
        }
        assert_eq!(read_frame(&mut server).await.unwrap(), b"first");
        assert_eq!(read_frame(&mut server).await.unwrap(), b"");
        assert_eq!(read_frame(&mut server).await.unwrap(), b"third frame");
    }

    #[tokio::test]
    async fn truncated_body_is_connection_closed() {
        let (mut client, mut server) = tokio::io::duplex(64);
        // Declare 10 bytes, deliver 3, then close.
        client.write_all(b"10  abc").await.unwrap();
        drop(client);

        match read_frame(&mut server).await {
            Err(WireError::ConnectionClosed) => {}
            other => panic!("expected ConnectionClosed, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn closed_mid_header_is_connection_closed() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(b"12").await.unwrap();
        drop(client);

        match read_frame(&mut server).await {
            Err(WireError::ConnectionClosed) => {}
            other => panic!("expected ConnectionClosed, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn junk_header_is_bad_header() {
        let (mut client, mut server) = tokio::io::duplex(64);
        client.write_all(b"abcd").await.unwrap();

        match read_frame(&mut server).await {
            Err(WireError::BadHeader { header }) => assert_eq!(header, "abcd"),
            other => panic!("expected BadHeader, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn oversized_body_rejected_before_write() {
        let (mut client, _server) = tokio::io::duplex(64);
        let body = vec![b'x'; MAX_BODY_LEN + 1];

        match write_frame(&mut client, &body).await {
            Err(WireError::FrameTooLarge { len, max }) => {
                assert_eq!(len, MAX_BODY_LEN + 1);
                assert_eq!(max, MAX_BODY_LEN);
            }
            other => panic!("expected FrameTooLarge, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn max_width_body_accepted() {
        let (mut client, mut server) = tokio::io::duplex(MAX_BODY_LEN * 2);
        let body = vec![b'y'; MAX_BODY_LEN];
        write_frame(&mut client, &body).await.unwrap();
        assert_eq!(read_frame(&mut server).await.unwrap().len(), MAX_BODY_LEN);
    }
}
