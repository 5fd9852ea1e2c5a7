//! Parser: tokenized tree to [`XapiRoot`].
//!
//! The first element named `Root` (pre-order) is the document. A document
//! without one parses to an empty root. Datasets are read both as direct
//! children of `Root` and inside a `Datasets` wrapper, so output of either
//! writer layout parses back.
//!
//! Structural violations abort the whole call; no partially built root is
//! returned. Values that fail typed conversion are kept as text.

use std::io::Read;

use tracing::{debug, trace, warn};

use crate::config::XapiOptions;
use crate::error::{Result, XapiError};
use crate::escape::unescape;
use crate::model::{Col, ColumnDef, ConstColumnDef, Dataset, Parameter, XapiRoot};
use crate::types::{ColumnType, RowType};
use crate::value::{Value, string_to_typed};
use crate::xml::tokenizer::{Element, tokenize};

/// Parses an X-API document from a string.
///
/// # Examples
///
/// ```rust
/// use xapi_core::{Value, XapiOptions, parse_str};
///
/// let xml = r#"<Root><Parameters><Parameter id="p" type="INT" value="42"/></Parameters></Root>"#;
/// let root = parse_str(xml, &XapiOptions::default())?;
/// assert_eq!(root.get_parameter("p").and_then(|p| p.value.clone()), Some(Value::Int(42)));
/// # Ok::<(), xapi_core::XapiError>(())
/// ```
pub fn parse_str(xml: &str, options: &XapiOptions) -> Result<XapiRoot> {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let forest = tokenize(xml);
    let root = match forest.iter().find_map(|element| element.find("Root")) {
        Some(element) => RootParser::new(options).parse(element)?,
        None => {
            debug!("no Root element found, returning an empty root");
            XapiRoot::new()
        }
    };

    debug!(
        parameters = root.parameter_size(),
        datasets = root.dataset_size(),
        parse_to_types = options.parse_to_types,
        "parsed X-API document"
    );
    Ok(root)
}

/// Parses an X-API document from UTF-8 bytes.
pub fn parse_slice(xml: &[u8], options: &XapiOptions) -> Result<XapiRoot> {
    let xml = std::str::from_utf8(xml)?;
    parse_str(xml, options)
}

/// Reads the whole input, then parses it.
pub fn parse_reader<R: Read>(mut reader: R, options: &XapiOptions) -> Result<XapiRoot> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    parse_slice(&buffer, options)
}

/// Parses a transport body that may be missing.
///
/// A missing body fails with [`XapiError::EmptyBody`]. A body that is present
/// but holds no `Root` element parses to an empty root.
pub fn parse_body<R: Read>(body: Option<R>, options: &XapiOptions) -> Result<XapiRoot> {
    match body {
        Some(reader) => parse_reader(reader, options),
        None => Err(XapiError::EmptyBody),
    }
}

/// Reads the whole async input, then parses it.
#[cfg(feature = "tokio")]
pub async fn parse_async<R>(mut reader: R, options: &XapiOptions) -> Result<XapiRoot>
where
    R: tokio::io::AsyncRead + Unpin,
{
    use tokio::io::AsyncReadExt;

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer).await?;
    parse_slice(&buffer, options)
}

/// Builds the model from the `Root` element.
struct RootParser<'o> {
    options: &'o XapiOptions,
}

impl<'o> RootParser<'o> {
    fn new(options: &'o XapiOptions) -> Self {
        Self { options }
    }

    fn parse(&self, element: &Element) -> Result<XapiRoot> {
        let mut root = XapiRoot::new();

        for child in element.elements() {
            match child.name.as_str() {
                "Parameters" => {
                    for parameter in child.children_named("Parameter") {
                        root.add_parameter(self.parameter(parameter)?);
                    }
                }
                "Dataset" => root.add_dataset(self.dataset(child)?),
                "Datasets" => {
                    for dataset in child.children_named("Dataset") {
                        root.add_dataset(self.dataset(dataset)?);
                    }
                }
                other => trace!(element = other, "skipping unknown element under Root"),
            }
        }

        Ok(root)
    }

    fn parameter(&self, element: &Element) -> Result<Parameter> {
        let id = required_id(element)?;
        let column_type = element.attribute("type").map(parse_column_type).transpose()?;

        // Attribute form first, then the text-content form.
        let raw = match element.attribute("value") {
            Some(value) => unescape(value).into_owned(),
            None => unescape(&element.text()).into_owned(),
        };
        let value = self.value(raw, column_type.unwrap_or_default());

        Ok(Parameter {
            id,
            column_type,
            value,
        })
    }

    fn dataset(&self, element: &Element) -> Result<Dataset> {
        let id = element
            .attribute("id")
            .map(|id| unescape(id).into_owned())
            .ok_or(XapiError::MissingDatasetId)?;
        let mut dataset = Dataset::new(id);
        let rows = element.child("Rows");

        // The writer leaves ColumnInfo out of a dataset with no columns, so
        // only a dataset that also carries row content must declare it.
        let column_info = match element.child("ColumnInfo") {
            Some(column_info) => column_info,
            None if rows.is_some_and(|rows| rows.elements().next().is_some()) => {
                return Err(XapiError::MissingColumnInfo {
                    dataset: dataset.id.clone(),
                });
            }
            None => {
                trace!(dataset = %dataset.id, "dataset without ColumnInfo or rows");
                return Ok(dataset);
            }
        };

        for declaration in column_info.elements() {
            match declaration.name.as_str() {
                "Column" => {
                    let column = ColumnDef::new(
                        required_id(declaration)?,
                        declared_type(declaration)?,
                        declared_size(declaration),
                    );
                    dataset.add_column(column);
                }
                "ConstColumn" => {
                    let column_type = declared_type(declaration)?;
                    let raw = declaration
                        .attribute("value")
                        .map(|value| unescape(value).into_owned())
                        .unwrap_or_default();
                    dataset.add_const_column(ConstColumnDef {
                        id: required_id(declaration)?,
                        size: declared_size(declaration),
                        column_type,
                        value: self.value(raw, column_type),
                    });
                }
                other => trace!(element = other, "skipping unknown element in ColumnInfo"),
            }
        }

        if let Some(rows) = rows {
            self.rows(&mut dataset, rows)?;
        }

        debug!(
            dataset = %dataset.id,
            columns = dataset.column_size(),
            const_columns = dataset.const_column_size(),
            rows = dataset.row_size(),
            "parsed dataset"
        );
        Ok(dataset)
    }

    fn rows(&self, dataset: &mut Dataset, rows: &Element) -> Result<()> {
        // Index of the most recently opened row.
        let mut current: Option<usize> = None;

        for element in rows.elements() {
            match element.name.as_str() {
                "Row" => {
                    let row = dataset.new_row();
                    current = Some(row);
                    dataset.set_row_type(row, row_type(element))?;

                    for child in element.elements() {
                        match child.name.as_str() {
                            "Col" => self.cell(dataset, row, child, false)?,
                            "OrgRow" => self.org_row(dataset, row, child)?,
                            other => trace!(element = other, "skipping unknown element in Row"),
                        }
                    }
                }
                "Col" => {
                    let row = current.ok_or_else(|| XapiError::ColBeforeRow {
                        dataset: dataset.id.clone(),
                    })?;
                    self.cell(dataset, row, element, false)?;
                }
                "OrgRow" => {
                    let row = current.ok_or_else(|| XapiError::OrgRowBeforeRow {
                        dataset: dataset.id.clone(),
                    })?;
                    self.org_row(dataset, row, element)?;
                }
                other => trace!(element = other, "skipping unknown element in Rows"),
            }
        }

        Ok(())
    }

    fn org_row(&self, dataset: &mut Dataset, row: usize, element: &Element) -> Result<()> {
        dataset.row_mut(row)?.ensure_org_row();
        for col in element.children_named("Col") {
            self.cell(dataset, row, col, true)?;
        }
        Ok(())
    }

    fn cell(&self, dataset: &mut Dataset, row: usize, element: &Element, original: bool) -> Result<()> {
        let id = required_id(element)?;
        let index = dataset.require_column(&id)?;
        let column_type = dataset
            .get_column_info(&id)
            .map(|column| column.column_type)
            .unwrap_or_default();

        let raw = unescape(&element.text()).into_owned();
        let col = Col::new(id, self.value(raw, column_type));

        let target = dataset.row_mut(row)?;
        if original {
            target.set_org_col(index, col);
        } else {
            target.set_col(index, col);
        }
        Ok(())
    }

    /// Empty text is absent; anything else is converted when type casting is on.
    fn value(&self, raw: String, column_type: ColumnType) -> Option<Value> {
        if raw.is_empty() {
            None
        } else if self.options.parse_to_types {
            Some(string_to_typed(&raw, column_type))
        } else {
            Some(Value::String(raw))
        }
    }
}

fn required_id(element: &Element) -> Result<String> {
    element
        .attribute("id")
        .map(|id| unescape(id).into_owned())
        .ok_or_else(|| {
            XapiError::InvalidXml(format!(
                "{} element is missing the required id attribute",
                element.name
            ))
        })
}

fn parse_column_type(label: &str) -> Result<ColumnType> {
    unescape(label).parse()
}

fn declared_type(element: &Element) -> Result<ColumnType> {
    element
        .attribute("type")
        .map(parse_column_type)
        .transpose()
        .map(Option::unwrap_or_default)
}

fn declared_size(element: &Element) -> u32 {
    element
        .attribute("size")
        .and_then(|size| size.trim().parse().ok())
        .unwrap_or(0)
}

fn row_type(element: &Element) -> Option<RowType> {
    let label = element.attribute("type")?;
    match label.parse() {
        Ok(row_type) => Some(row_type),
        Err(_) => {
            warn!(row_type = label, "ignoring unrecognised row type");
            None
        }
    }
}
