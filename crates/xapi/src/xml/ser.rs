//! Writer: [`XapiRoot`] to an indented X-API document.
//!
//! Events go through quick-xml's indenting `Writer`. Attribute values and
//! text are escaped here (predefined entities plus control-character
//! references) and handed over as already-escaped bytes, so quick-xml never
//! escapes them a second time.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use crate::config::{DatasetLayout, XapiOptions};
use crate::error::Result;
use crate::escape::escape;
use crate::model::{Col, Dataset, Parameter, Row, XapiRoot};
use crate::types::ColumnType;
use crate::value::typed_to_string;

/// Writes a root to a string.
///
/// # Examples
///
/// ```rust
/// use xapi_core::{Parameter, XapiOptions, XapiRoot, write_to_string};
///
/// let mut root = XapiRoot::new();
/// root.add_parameter(Parameter::new("service", "stock"));
///
/// let xml = write_to_string(&root, &XapiOptions::default())?;
/// assert!(xml.contains(r#"<Parameter id="service" value="stock"/>"#));
/// # Ok::<(), xapi_core::XapiError>(())
/// ```
pub fn write_to_string(root: &XapiRoot, options: &XapiOptions) -> Result<String> {
    let buffer = write_to_vec(root, options)?;
    Ok(String::from_utf8(buffer)?)
}

/// Writes a root to a byte vector.
pub fn write_to_vec(root: &XapiRoot, options: &XapiOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write(&mut buffer, root, options)?;
    Ok(buffer)
}

/// Writes a root to any `io::Write` sink.
pub fn write<W: Write>(writer: W, root: &XapiRoot, options: &XapiOptions) -> Result<()> {
    let mut serializer = XapiWriter::new(writer, options);
    serializer.write_root(root)?;
    serializer.finish()
}

/// Serializes the document, then writes it to an async sink and flushes it.
#[cfg(feature = "tokio")]
pub async fn write_async<W>(mut writer: W, root: &XapiRoot, options: &XapiOptions) -> Result<()>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    use tokio::io::AsyncWriteExt;

    let buffer = write_to_vec(root, options)?;
    writer.write_all(&buffer).await?;
    writer.flush().await?;
    Ok(())
}

struct XapiWriter<'o, W: Write> {
    writer: Writer<W>,
    options: &'o XapiOptions,
}

impl<'o, W: Write> XapiWriter<'o, W> {
    fn new(writer: W, options: &'o XapiOptions) -> Self {
        Self {
            writer: Writer::new_with_indent(writer, b' ', 2),
            options,
        }
    }

    /// Terminates the document with a newline and flushes the sink.
    fn finish(self) -> Result<()> {
        let mut inner = self.writer.into_inner();
        inner.write_all(b"\n")?;
        inner.flush()?;
        Ok(())
    }

    fn write_root(&mut self, root: &XapiRoot) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let version = &self.options.version;
        let element = start(
            "Root",
            &[
                ("xmlns", Cow::Borrowed(version.xmlns.as_ref())),
                ("version", Cow::Borrowed(version.version.as_ref())),
            ],
        );
        self.writer.write_event(Event::Start(element))?;

        if root.parameter_size() > 0 {
            self.write_start("Parameters")?;
            for parameter in root.iter_parameters() {
                self.write_parameter(parameter)?;
            }
            self.write_end("Parameters")?;
        }

        if root.dataset_size() > 0 {
            let wrapped = self.options.dataset_layout == DatasetLayout::Wrapped;
            if wrapped {
                self.write_start("Datasets")?;
            }
            for dataset in root.iter_datasets() {
                self.write_dataset(dataset)?;
            }
            if wrapped {
                self.write_end("Datasets")?;
            }
        }

        self.write_end("Root")?;

        debug!(
            parameters = root.parameter_size(),
            datasets = root.dataset_size(),
            layout = %self.options.dataset_layout,
            "wrote X-API document"
        );
        Ok(())
    }

    fn write_parameter(&mut self, parameter: &Parameter) -> Result<()> {
        let mut attributes = vec![("id", Cow::Borrowed(parameter.id.as_str()))];
        if let Some(column_type) = parameter.column_type {
            attributes.push(("type", Cow::Borrowed(column_type.as_str())));
        }
        if let Some(value) = &parameter.value {
            let text = typed_to_string(value, parameter.effective_type());
            attributes.push(("value", Cow::Owned(text)));
        }
        self.writer
            .write_event(Event::Empty(start("Parameter", &attributes)))?;
        Ok(())
    }

    fn write_dataset(&mut self, dataset: &Dataset) -> Result<()> {
        let element = start("Dataset", &[("id", Cow::Borrowed(dataset.id.as_str()))]);
        self.writer.write_event(Event::Start(element))?;

        if dataset.column_size() > 0 || dataset.const_column_size() > 0 {
            self.write_start("ColumnInfo")?;
            for column in dataset.iter_const_columns() {
                let value = column
                    .value
                    .as_ref()
                    .map(|value| typed_to_string(value, column.column_type))
                    .unwrap_or_default();
                let element = start(
                    "ConstColumn",
                    &[
                        ("id", Cow::Borrowed(column.id.as_str())),
                        ("size", Cow::Owned(column.size.to_string())),
                        ("type", Cow::Borrowed(column.column_type.as_str())),
                        ("value", Cow::Owned(value)),
                    ],
                );
                self.writer.write_event(Event::Empty(element))?;
            }
            for column in dataset.iter_columns() {
                let element = start(
                    "Column",
                    &[
                        ("id", Cow::Borrowed(column.id.as_str())),
                        ("size", Cow::Owned(column.size.to_string())),
                        ("type", Cow::Borrowed(column.column_type.as_str())),
                    ],
                );
                self.writer.write_event(Event::Empty(element))?;
            }
            self.write_end("ColumnInfo")?;
        }

        if dataset.row_size() == 0 {
            self.writer.write_event(Event::Empty(BytesStart::new("Rows")))?;
        } else {
            self.write_start("Rows")?;
            for row in dataset.iter_rows() {
                self.write_row(dataset, row)?;
            }
            self.write_end("Rows")?;
        }

        self.write_end("Dataset")
    }

    fn write_row(&mut self, dataset: &Dataset, row: &Row) -> Result<()> {
        let element = match row.row_type {
            Some(row_type) => start("Row", &[("type", Cow::Borrowed(row_type.as_str()))]),
            None => BytesStart::new("Row"),
        };
        self.writer.write_event(Event::Start(element))?;

        for (index, col) in row.cols() {
            self.write_col(col, column_type_at(dataset, index))?;
        }

        if row.org_cols().next().is_some() {
            self.write_start("OrgRow")?;
            for (index, col) in row.org_cols() {
                self.write_col(col, column_type_at(dataset, index))?;
            }
            self.write_end("OrgRow")?;
        }

        self.write_end("Row")
    }

    /// Self-closing when the cell is empty, text-bearing otherwise.
    fn write_col(&mut self, col: &Col, column_type: ColumnType) -> Result<()> {
        let element = start("Col", &[("id", Cow::Borrowed(col.id.as_str()))]);
        match &col.value {
            None => self.writer.write_event(Event::Empty(element))?,
            Some(value) => {
                let text = typed_to_string(value, column_type);
                self.writer.write_event(Event::Start(element))?;
                self.writer
                    .write_event(Event::Text(BytesText::from_escaped(escape(&text))))?;
                self.writer.write_event(Event::End(BytesEnd::new("Col")))?;
            }
        }
        Ok(())
    }

    fn write_start(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn write_end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}

/// Builds a start tag from unescaped attribute values.
fn start<'a>(name: &'a str, attributes: &[(&str, Cow<'_, str>)]) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    for (key, value) in attributes {
        let escaped = escape(value);
        // Raw byte pairs are pushed as-is, without a second escaping pass
        element.push_attribute((key.as_bytes(), escaped.as_bytes()));
    }
    element
}

/// Declared type of the column at `index`, `STRING` for unknown positions.
fn column_type_at(dataset: &Dataset, index: usize) -> ColumnType {
    dataset
        .columns()
        .get(index)
        .map(|column| column.column_type)
        .unwrap_or_default()
}
