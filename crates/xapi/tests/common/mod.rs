//! Shared fixtures for the integration tests.

#![allow(dead_code)]

/// XPLATFORM document with text-content parameters and const columns.
pub const STOCK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Root xmlns="http://www.tobesoft.com/platform/Dataset" ver="4000">
  <Parameters>
    <Parameter id="service">stock</Parameter>
    <Parameter id="method">search</Parameter>
  </Parameters>
  <Dataset id="output">
    <ColumnInfo>
      <ConstColumn id="market" size="10" type="STRING" value="kse" />
      <ConstColumn id="openprice" size="10" type="INT" value="15000" />
      <Column id="stockCode" size="5" type="STRING" />
      <Column id="currentprice" size="10" type="INT" />
    </ColumnInfo>
    <Rows>
      <Row>
        <Col id="stockCode">10001</Col>
        <Col id="currentprice">5700</Col>
      </Row>
      <Row>
        <Col id="stockCode">10002</Col>
        <Col id="currentprice">14500</Col>
      </Row>
    </Rows>
  </Dataset>
</Root>"#;

/// Nexacro document touching every column type.
pub const TYPED_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Root xmlns="http://www.nexacroplatform.com/platform/dataset" version="4000">
  <Parameters>
    <Parameter id="stringParam" type="STRING" value="testString" />
    <Parameter id="intParam" type="INT" value="123" />
    <Parameter id="floatParam" type="FLOAT" value="123.45" />
    <Parameter id="dateParam" type="DATE" value="20230615" />
    <Parameter id="datetimeParam" type="DATETIME" value="20230615143022" />
    <Parameter id="timeParam" type="TIME" value="143022" />
  </Parameters>
  <Dataset id="complexData">
    <ColumnInfo>
      <ConstColumn id="constString" size="10" type="STRING" value="const" />
      <ConstColumn id="constInt" size="10" type="INT" value="100" />
      <Column id="stringCol" size="50" type="STRING" />
      <Column id="intCol" size="10" type="INT" />
      <Column id="floatCol" size="10" type="FLOAT" />
      <Column id="decimalCol" size="10" type="DECIMAL" />
      <Column id="bigDecimalCol" size="10" type="BIGDECIMAL" />
      <Column id="dateCol" size="8" type="DATE" />
      <Column id="datetimeCol" size="14" type="DATETIME" />
      <Column id="timeCol" size="6" type="TIME" />
      <Column id="blobCol" size="100" type="BLOB" />
    </ColumnInfo>
    <Rows>
      <Row type="insert">
        <Col id="stringCol">test string</Col>
        <Col id="intCol">42</Col>
        <Col id="floatCol">2.5</Col>
        <Col id="decimalCol">99.99</Col>
        <Col id="bigDecimalCol">1234567890</Col>
        <Col id="dateCol">20230615</Col>
        <Col id="datetimeCol">20230615143022</Col>
        <Col id="timeCol">143022</Col>
        <Col id="blobCol">SGVsbG8gV29ybGQ=</Col>
        <OrgRow>
          <Col id="stringCol">old string</Col>
          <Col id="intCol">24</Col>
        </OrgRow>
      </Row>
      <Row type="update">
        <Col id="stringCol"></Col>
        <Col id="intCol" />
      </Row>
    </Rows>
  </Dataset>
</Root>"#;

/// Dataset with one declared column wrapped around the given `Rows` body.
pub fn single_column_dataset(column_type: &str, rows: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Root xmlns="http://www.tobesoft.com/platform/Dataset" version="4000">
  <Dataset id="test">
    <ColumnInfo>
      <Column id="c" size="10" type="{column_type}" />
    </ColumnInfo>
    <Rows>
{rows}
    </Rows>
  </Dataset>
</Root>"#
    )
}
