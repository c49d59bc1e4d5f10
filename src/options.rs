/// Decode options.
///
/// Defaults reproduce the behaviour of printers and common viewers: the Z64
/// checksum is ignored, short ASCII data is padded with blank bytes and line
/// breaks inside the payload are kept as data.
///
/// # Example
///
/// ```
/// use zpl_gf::DecodeOptions;
///
/// let options = DecodeOptions::new()
///     .verify_checksum(true)
///     .strict_length(true);
/// assert!(options.checks_checksum());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    verify_checksum: bool,
    strict_length: bool,
    skip_line_breaks: bool,
}

impl DecodeOptions {
    pub fn new() -> DecodeOptions {
        DecodeOptions::default()
    }

    /// Check the Z64 CRC segment against the base64 text.
    pub fn verify_checksum(self, flag: bool) -> Self {
        DecodeOptions {
            verify_checksum: flag,
            ..self
        }
    }

    /// Require the decoded buffer to be exactly the declared total byte count.
    pub fn strict_length(self, flag: bool) -> Self {
        DecodeOptions {
            strict_length: flag,
            ..self
        }
    }

    /// Drop CR and LF from the graphic data before decoding, for both ASCII
    /// and Z64 payloads. The Z64 checksum then covers the joined base64 text.
    pub fn skip_line_breaks(self, flag: bool) -> Self {
        DecodeOptions {
            skip_line_breaks: flag,
            ..self
        }
    }

    pub fn checks_checksum(&self) -> bool {
        self.verify_checksum
    }

    pub fn checks_length(&self) -> bool {
        self.strict_length
    }

    pub fn skips_line_breaks(&self) -> bool {
        self.skip_line_breaks
    }
}
