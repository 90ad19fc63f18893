//! PDF object types.
//!
//! Plain data holders for the subset of the object model the
//! comparison pipeline needs: values, streams and their filter
//! parameters. Stream decoding threads `/EarlyChange` into the LZW
//! engine exactly once, at decode time.

use std::collections::HashMap;

use bytes::Bytes;

use crate::codec::lzw::lzwdecode_with_earlychange;
use crate::error::{DeltaError, Result};

/// PDF Object types - the fundamental value type in PDF.
#[derive(Debug, Clone, PartialEq)]
pub enum PDFObject {
    /// Null object
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Real (floating point) value
    Real(f64),
    /// Name object (e.g., /Filter, /LZWDecode)
    Name(String),
    /// String (byte array)
    String(Vec<u8>),
    /// Array of objects
    Array(Vec<Self>),
    /// Dictionary (name -> object mapping)
    Dict(HashMap<String, Self>),
    /// Stream (dictionary + binary data)
    Stream(Box<PDFStream>),
    /// Indirect object reference
    Ref(PDFObjRef),
}

impl PDFObject {
    /// Check if this is a null object
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get as integer
    pub const fn as_int(&self) -> Result<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            _ => Err(DeltaError::TypeError {
                expected: "int",
                got: self.type_name(),
            }),
        }
    }

    /// Get as name string
    pub fn as_name(&self) -> Result<&str> {
        match self {
            Self::Name(s) => Ok(s),
            _ => Err(DeltaError::TypeError {
                expected: "name",
                got: self.type_name(),
            }),
        }
    }

    /// Get as array
    pub const fn as_array(&self) -> Result<&Vec<Self>> {
        match self {
            Self::Array(arr) => Ok(arr),
            _ => Err(DeltaError::TypeError {
                expected: "array",
                got: self.type_name(),
            }),
        }
    }

    /// Get as dictionary
    pub const fn as_dict(&self) -> Result<&HashMap<String, Self>> {
        match self {
            Self::Dict(d) => Ok(d),
            _ => Err(DeltaError::TypeError {
                expected: "dict",
                got: self.type_name(),
            }),
        }
    }

    /// Get as stream
    pub fn as_stream(&self) -> Result<&PDFStream> {
        match self {
            Self::Stream(s) => Ok(s),
            _ => Err(DeltaError::TypeError {
                expected: "stream",
                got: self.type_name(),
            }),
        }
    }

    /// Get type name for error messages
    const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Real(_) => "real",
            Self::Name(_) => "name",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Dict(_) => "dict",
            Self::Stream(_) => "stream",
            Self::Ref(_) => "ref",
        }
    }
}

/// PDF indirect object reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PDFObjRef {
    /// Object ID
    pub objid: u32,
    /// Generation number
    pub genno: u32,
}

impl PDFObjRef {
    /// Create a new object reference.
    pub const fn new(objid: u32, genno: u32) -> Self {
        Self { objid, genno }
    }
}

/// PDF Stream - dictionary attributes + binary data.
#[derive(Debug, Clone, PartialEq)]
pub struct PDFStream {
    /// Stream dictionary attributes
    pub attrs: HashMap<String, PDFObject>,
    /// Raw (possibly encoded) data
    rawdata: Bytes,
    /// Decoded data (lazily populated)
    data: Option<Vec<u8>>,
    /// Object ID (set when stream is part of a document)
    pub objid: Option<u32>,
    /// Generation number
    pub genno: Option<u32>,
}

impl PDFStream {
    /// Create a new stream.
    pub fn new(attrs: HashMap<String, PDFObject>, rawdata: impl Into<Bytes>) -> Self {
        Self {
            attrs,
            rawdata: rawdata.into(),
            data: None,
            objid: None,
            genno: None,
        }
    }

    /// Set object ID and generation number.
    pub const fn set_objid(&mut self, objid: u32, genno: u32) {
        self.objid = Some(objid);
        self.genno = Some(genno);
    }

    /// Get raw (undecoded) data.
    pub fn get_rawdata(&self) -> &[u8] {
        self.rawdata.as_ref()
    }

    /// Get attribute by name.
    pub fn get(&self, name: &str) -> Option<&PDFObject> {
        self.attrs.get(name)
    }

    /// Get attribute, trying multiple names.
    pub fn get_any(&self, names: &[&str]) -> Option<&PDFObject> {
        names.iter().find_map(|name| self.attrs.get(*name))
    }

    /// Normalize `/Filter` and `/DecodeParms` into an ordered list of
    /// (filter name, parameter dict) pairs.
    ///
    /// Both keys accept a single value or an array, and the
    /// abbreviated `/F` and `/DP` spellings are honored.
    pub fn get_filters(&self) -> Result<Vec<(String, Option<&HashMap<String, PDFObject>>)>> {
        let Some(filters) = self.get_any(&["Filter", "F"]) else {
            return Ok(Vec::new());
        };
        let params = self.get_any(&["DecodeParms", "DP", "Parms"]);

        let names: Vec<&str> = match filters {
            PDFObject::Array(arr) => arr.iter().map(PDFObject::as_name).collect::<Result<_>>()?,
            single => vec![single.as_name()?],
        };
        let mut param_dicts: Vec<Option<&HashMap<String, PDFObject>>> = match params {
            Some(PDFObject::Array(arr)) => arr
                .iter()
                .map(|obj| match obj {
                    PDFObject::Dict(d) => Some(d),
                    _ => None,
                })
                .collect(),
            Some(PDFObject::Dict(d)) => vec![Some(d)],
            _ => Vec::new(),
        };
        param_dicts.resize(names.len(), None);

        Ok(names
            .into_iter()
            .map(str::to_string)
            .zip(param_dicts)
            .collect())
    }

    /// Decode the raw data through the stream's filter chain,
    /// caching the result.
    pub fn decode(&mut self) -> Result<()> {
        if self.data.is_some() {
            return Ok(());
        }
        let mut data = self.rawdata.to_vec();
        for (name, params) in self.get_filters()? {
            data = match name.as_str() {
                "LZWDecode" | "LZW" => {
                    let early_change = match params.and_then(|p| p.get("EarlyChange")) {
                        // Tolerant read: anything nonzero selects the
                        // PDF default boundary.
                        Some(obj) => i32::from(obj.as_int()? != 0),
                        None => 1,
                    };
                    lzwdecode_with_earlychange(&data, early_change)?
                }
                other => {
                    return Err(DeltaError::DecodeError(format!(
                        "unsupported filter: {other}"
                    )));
                }
            };
        }
        self.data = Some(data);
        Ok(())
    }

    /// Get decoded data, running the filter chain on first use.
    pub fn get_data(&mut self) -> Result<&[u8]> {
        self.decode()?;
        Ok(self.data.as_deref().unwrap_or_default())
    }
}
