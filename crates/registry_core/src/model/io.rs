//! Input and output parameter records.
//!
//! Experiments, workflow nodes and tasks each own an input table and an
//! output table with identical value columns; only the owner column differs.

use super::{flag, int, opt_text, text, Entity};
use crate::query::{Record, RecordError};
use crate::resource::ResourceType;
use crate::schema::{input as i, output as o, owner};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFields {
    pub input_key: String,
    pub data_type: Option<String>,
    pub value: Option<String>,
    pub metadata: Option<String>,
    pub app_argument: Option<String>,
    pub input_order: i64,
    pub standard_input: bool,
    pub user_friendly_desc: Option<String>,
    pub is_required: bool,
    pub required_to_cmd: bool,
    pub data_staged: bool,
}

impl InputFields {
    fn extend_row(&self, row: &mut Vec<(&'static str, Value)>) {
        row.extend([
            (i::INPUT_KEY, text(&self.input_key)),
            (i::DATA_TYPE, opt_text(&self.data_type)),
            (i::VALUE, opt_text(&self.value)),
            (i::METADATA, opt_text(&self.metadata)),
            (i::APP_ARGUMENT, opt_text(&self.app_argument)),
            (i::INPUT_ORDER, int(self.input_order)),
            (i::STANDARD_INPUT, flag(self.standard_input)),
            (i::USER_FRIENDLY_DESC, opt_text(&self.user_friendly_desc)),
            (i::IS_REQUIRED, flag(self.is_required)),
            (i::REQUIRED_TO_CMD, flag(self.required_to_cmd)),
            (i::DATA_STAGED, flag(self.data_staged)),
        ]);
    }

    fn read(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            input_key: record.text(i::INPUT_KEY)?,
            data_type: record.opt_text(i::DATA_TYPE)?,
            value: record.opt_text(i::VALUE)?,
            metadata: record.opt_text(i::METADATA)?,
            app_argument: record.opt_text(i::APP_ARGUMENT)?,
            input_order: record.int(i::INPUT_ORDER)?,
            standard_input: record.bool(i::STANDARD_INPUT)?,
            user_friendly_desc: record.opt_text(i::USER_FRIENDLY_DESC)?,
            is_required: record.bool(i::IS_REQUIRED)?,
            required_to_cmd: record.bool(i::REQUIRED_TO_CMD)?,
            data_staged: record.bool(i::DATA_STAGED)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFields {
    pub output_key: String,
    pub data_type: Option<String>,
    pub value: Option<String>,
    pub is_required: bool,
    pub required_to_cmd: bool,
    pub data_movement: bool,
    pub data_name_location: Option<String>,
    pub search_query: Option<String>,
    pub app_argument: Option<String>,
}

impl OutputFields {
    fn extend_row(&self, row: &mut Vec<(&'static str, Value)>) {
        row.extend([
            (o::OUTPUT_KEY, text(&self.output_key)),
            (o::DATA_TYPE, opt_text(&self.data_type)),
            (o::VALUE, opt_text(&self.value)),
            (o::IS_REQUIRED, flag(self.is_required)),
            (o::REQUIRED_TO_CMD, flag(self.required_to_cmd)),
            (o::DATA_MOVEMENT, flag(self.data_movement)),
            (o::DATA_NAME_LOCATION, opt_text(&self.data_name_location)),
            (o::SEARCH_QUERY, opt_text(&self.search_query)),
            (o::APP_ARGUMENT, opt_text(&self.app_argument)),
        ]);
    }

    fn read(record: &Record) -> Result<Self, RecordError> {
        Ok(Self {
            output_key: record.text(o::OUTPUT_KEY)?,
            data_type: record.opt_text(o::DATA_TYPE)?,
            value: record.opt_text(o::VALUE)?,
            is_required: record.bool(o::IS_REQUIRED)?,
            required_to_cmd: record.bool(o::REQUIRED_TO_CMD)?,
            data_movement: record.bool(o::DATA_MOVEMENT)?,
            data_name_location: record.opt_text(o::DATA_NAME_LOCATION)?,
            search_query: record.opt_text(o::SEARCH_QUERY)?,
            app_argument: record.opt_text(o::APP_ARGUMENT)?,
        })
    }
}

// Each owned variant: (struct, kind, owner field/column, shared fields type).
macro_rules! owned_parameter {
    ($name:ident, $kind:ident, $owner:ident, $column:expr, $fields:ident, $field:ident) => {
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            pub $owner: String,
            #[serde(flatten)]
            pub $field: $fields,
        }

        impl Entity for $name {
            const KIND: ResourceType = ResourceType::$kind;

            fn to_row(&self) -> Vec<(&'static str, Value)> {
                let mut row = vec![($column, text(&self.$owner))];
                self.$field.extend_row(&mut row);
                row
            }

            fn from_record(record: &Record) -> Result<Self, RecordError> {
                Ok(Self {
                    $owner: record.text($column)?,
                    $field: $fields::read(record)?,
                })
            }
        }
    };
}

owned_parameter!(ExperimentInput, ExperimentInput, experiment_id, owner::EXPERIMENT_ID, InputFields, input);
owned_parameter!(ExperimentOutput, ExperimentOutput, experiment_id, owner::EXPERIMENT_ID, OutputFields, output);
owned_parameter!(NodeInput, NodeInput, node_instance_id, owner::NODE_INSTANCE_ID, InputFields, input);
owned_parameter!(NodeOutput, NodeOutput, node_instance_id, owner::NODE_INSTANCE_ID, OutputFields, output);
owned_parameter!(ApplicationInput, ApplicationInput, task_id, owner::TASK_ID, InputFields, input);
owned_parameter!(ApplicationOutput, ApplicationOutput, task_id, owner::TASK_ID, OutputFields, output);

#[cfg(test)]
mod tests {
    use super::{ExperimentInput, InputFields};
    use crate::model::Entity;
    use crate::query::Record;

    #[test]
    fn owner_column_leads_the_row() {
        let input = ExperimentInput {
            experiment_id: "exp-1".to_string(),
            input: InputFields {
                input_key: "x".to_string(),
                input_order: 2,
                is_required: true,
                ..InputFields::default()
            },
        };

        let row = input.to_row();
        assert_eq!(row[0].0, "experiment_id");
        assert_eq!(row[1].0, "input_key");
        assert_eq!(
            ExperimentInput::from_record(&Record::from_row(row)).unwrap(),
            input
        );
    }
}
