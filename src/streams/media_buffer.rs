use crate::errors::ConfigError;

/// Initialization segment followed by media segment, as one immutable byte sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBuffer {
    bytes: Box<[u8]>,
    init_len: usize,
}

impl MediaBuffer {
    /// Concatenate `init` and `media`. Both segments must hold at least one byte.
    pub fn new(init: &[u8], media: &[u8]) -> Result<Self, ConfigError> {
        if init.is_empty() {
            return Err(ConfigError::new("initialization segment is empty"));
        }
        if media.is_empty() {
            return Err(ConfigError::new("media segment is empty"));
        }

        let mut bytes = Vec::with_capacity(init.len() + media.len());
        bytes.extend_from_slice(init);
        bytes.extend_from_slice(media);

        Ok(Self {
            bytes: bytes.into_boxed_slice(),
            init_len: init.len(),
        })
    }

    /// Same as [`MediaBuffer::new`] but reuses the init allocation.
    pub fn from_segments(mut init: Vec<u8>, media: Vec<u8>) -> Result<Self, ConfigError> {
        if init.is_empty() {
            return Err(ConfigError::new("initialization segment is empty"));
        }
        if media.is_empty() {
            return Err(ConfigError::new("media segment is empty"));
        }
        let init_len = init.len();
        init.extend_from_slice(&media);
        Ok(Self {
            bytes: init.into_boxed_slice(),
            init_len,
        })
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; construction rejects empty segments.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Length of the initialization segment, i.e. the offset where media bytes start.
    pub fn init_len(&self) -> usize {
        self.init_len
    }

    pub fn media_len(&self) -> usize {
        self.bytes.len() - self.init_len
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Up to `max` bytes starting at `offset`. Empty once `offset` reaches the end.
    pub fn slice_from(&self, offset: usize, max: usize) -> &[u8] {
        let start = offset.min(self.bytes.len());
        let end = start + max.min(self.bytes.len() - start);
        &self.bytes[start..end]
    }
}
