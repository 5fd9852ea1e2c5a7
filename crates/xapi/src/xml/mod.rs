//! X-API XML support.
//!
//! - [`tokenizer`]: lenient text-to-tree scanner
//! - [`de`]: tree to [`XapiRoot`](crate::XapiRoot)
//! - [`ser`]: [`XapiRoot`](crate::XapiRoot) to indented XML
//!
//! ## Wire format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <Root xmlns="http://www.nexacroplatform.com/platform/dataset" version="4000">
//!   <Parameters>
//!     <Parameter id="service" type="STRING" value="stock"/>
//!   </Parameters>
//!   <Datasets>
//!     <Dataset id="output">
//!       <ColumnInfo>
//!         <ConstColumn id="k" size="5" type="STRING" value="abcd"/>
//!         <Column id="name" size="100" type="STRING"/>
//!       </ColumnInfo>
//!       <Rows>
//!         <Row type="update">
//!           <Col id="name">new</Col>
//!           <OrgRow>
//!             <Col id="name">old</Col>
//!           </OrgRow>
//!         </Row>
//!       </Rows>
//!     </Dataset>
//!   </Datasets>
//! </Root>
//! ```

pub mod de;
pub mod ser;
pub mod tokenizer;

pub use de::{parse_body, parse_reader, parse_slice, parse_str};
pub use ser::{write, write_to_string, write_to_vec};

#[cfg(feature = "tokio")]
pub use de::parse_async;
#[cfg(feature = "tokio")]
pub use ser::write_async;
