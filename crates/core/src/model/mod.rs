//! Document object model: the data holders the codec layer feeds.

pub mod objects;

pub use objects::{PDFObjRef, PDFObject, PDFStream};
