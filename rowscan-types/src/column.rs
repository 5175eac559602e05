use arrow::datatypes::{DataType, Field};

/// Metadata of one result column: its reported name and scan type.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub scan_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, scan_type: DataType) -> Self {
        Self {
            name: name.into(),
            scan_type,
        }
    }
}

impl From<&Field> for Column {
    fn from(field: &Field) -> Self {
        Column::new(field.name().clone(), field.data_type().clone())
    }
}
