//! Byte-stream copy between a data channel and a local file, shared by
//! the server handlers and the client driver. A plain buffered copy:
//! no resume, no ranges, no chunking strategy beyond the fixed buffer.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const COPY_BUFFER_SIZE: usize = 8192;

/// Copies `reader` to `writer` until EOF and returns the number of
/// bytes moved. Any I/O error aborts the transfer and is surfaced to
/// the caller, which is still responsible for closing the data channel.
pub async fn copy_stream<R, W>(reader: &mut R, writer: &mut W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let mut total: u64 = 0;
    loop {
        let n = reader.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        writer.write_all(&buffer[..n]).await?;
        total += n as u64;
    }
    writer.flush().await?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copies_all_bytes_and_counts_them() {
        let payload = vec![7u8; 3 * COPY_BUFFER_SIZE + 17];
        let mut reader = &payload[..];
        let mut sink = Vec::new();
        let n = copy_stream(&mut reader, &mut sink).await.unwrap();
        assert_eq!(n, payload.len() as u64);
        assert_eq!(sink, payload);
    }

    #[tokio::test]
    async fn empty_stream_copies_zero_bytes() {
        let mut reader = &b""[..];
        let mut sink = Vec::new();
        assert_eq!(copy_stream(&mut reader, &mut sink).await.unwrap(), 0);
        assert!(sink.is_empty());
    }
}
