/// yEnc header from the =ybegin line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YencHeader {
    /// Line length (typically 128)
    pub line: usize,
    /// Total file size in bytes
    pub size: u64,
    /// Original filename (may contain spaces)
    pub name: String,
    /// Part number, when the article is one part of a larger file
    pub part: Option<u32>,
    /// Total number of parts
    pub total: Option<u32>,
}

/// Byte range from the =ypart line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YencPart {
    /// 1-based offset where this part begins in the original file
    pub begin: u64,
    /// Offset where this part ends in the original file
    pub end: u64,
}

/// yEnc trailer from the =yend line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YencEnd {
    /// Size of decoded data in bytes
    pub size: u64,
    /// CRC32 of the whole file
    pub crc32: Option<u32>,
    /// CRC32 of this part only
    pub pcrc32: Option<u32>,
}

/// A decoded yEnc body
#[derive(Debug, Clone)]
pub struct YencDecoded {
    pub header: YencHeader,
    pub part: Option<YencPart>,
    pub trailer: YencEnd,
    /// Decoded payload
    pub data: Vec<u8>,
    /// CRC32 computed over `data`
    pub calculated_crc32: u32,
}

impl YencDecoded {
    /// The CRC the trailer says `data` must have, if it says one
    ///
    /// A part CRC wins; a whole-file CRC only describes `data` when the
    /// article is not one part of a larger file.
    pub fn expected_crc32(&self) -> Option<u32> {
        self.trailer.pcrc32.or(if self.part.is_none() {
            self.trailer.crc32
        } else {
            None
        })
    }

    /// `false` only when the trailer carries a CRC and it does not match
    pub fn crc_matches(&self) -> bool {
        self.expected_crc32()
            .is_none_or(|expected| expected == self.calculated_crc32)
    }
}
