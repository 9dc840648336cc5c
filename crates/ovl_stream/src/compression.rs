//! Compressed sub-stream handling.

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};
use std::io::{Read, Write};
use tracing::{debug, instrument};

use crate::{
    error::{Error, Result},
    stream::Stream,
};

impl Stream {
    /// Inflate every byte from the cursor to the end into a new stream
    ///
    /// The compressed bytes are consumed, leaving the cursor at the end of this stream. The
    /// returned stream is independent and starts at offset zero.
    #[instrument(skip(self), err)]
    pub fn unzip(&mut self) -> Result<Stream> {
        let offset = self.tell()?;
        let compressed = self.read_to_end()?;

        let mut data = Vec::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_end(&mut data)
            .map_err(|source| Error::Decompression { offset, source })?;

        debug!(
            compressed = compressed.len(),
            uncompressed = data.len(),
            "inflated sub-stream"
        );
        Ok(Stream::from_bytes(data))
    }

    /// Deflate `data` and write it at the cursor, returning the compressed length
    #[instrument(skip_all, err)]
    pub fn write_compressed(&mut self, data: &[u8]) -> Result<u64> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;

        self.write_bytes(&compressed)?;
        debug!(
            compressed = compressed.len(),
            uncompressed = data.len(),
            "deflated sub-stream"
        );
        Ok(compressed.len() as u64)
    }
}
