//! File Store Block
//!
//! Hands a file reference (URL, data URI or local path) to the media store
//! of the current execution and emits the stored reference, or the file
//! content when `base_64` is set. Storage failures abort the invocation.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeSet;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata, BlockType, ExecutionContext};
use crate::core::field::{FieldDescriptor, FieldType};
use crate::core::output::BlockOutput;
use crate::core::schema::{BlockSchema, ValidatedInput};
use crate::core::BlockId;

const ID: BlockId = BlockId::from_uuid(uuid::uuid!("cbb50872-625b-42f0-8203-a2ae78242d8a"));

#[derive(Deserialize)]
struct Input {
    file_in: String,
    base_64: bool,
}

pub struct FileStoreBlock {
    metadata: BlockMetadata,
}

impl FileStoreBlock {
    pub fn new() -> Self {
        Self {
            metadata: Self::build_metadata(),
        }
    }

    fn build_metadata() -> BlockMetadata {
        BlockMetadata {
            id: ID,
            name: "FileStoreBlock".into(),
            description: "Stores the input file in the temporary directory.".into(),
            categories: BTreeSet::from([BlockCategory::Basic, BlockCategory::Multimedia]),
            input_schema: Self::build_inputs(),
            output_schema: Self::build_outputs(),
            static_output: true,
            block_type: BlockType::Standard,
            fixtures: Vec::new(),
        }
    }

    fn build_inputs() -> BlockSchema {
        BlockSchema::new(vec![
            FieldDescriptor::new("file_in", FieldType::MediaFile).description(
                "The file to store in the temporary directory, it can be a URL, data URI, or local path.",
            ),
            FieldDescriptor::new("base_64", FieldType::Boolean)
                .description(
                    "Whether produce an output in base64 format (not recommended, \
                     you can pass the string path just fine accross blocks).",
                )
                .default_value(false)
                .advanced()
                .title("Produce Base64 Output"),
        ])
    }

    fn build_outputs() -> BlockSchema {
        BlockSchema::new(vec![FieldDescriptor::new("file_out", FieldType::MediaFile)
            .description("The relative path to the stored file in the temporary directory.")])
    }
}

impl Default for FileStoreBlock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Block for FileStoreBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }

    async fn run(&self, input: ValidatedInput, context: &ExecutionContext) -> Result<BlockOutput, BlockError> {
        let input: Input = input.parse()?;
        let stored = context
            .media_store
            .store(&context.graph_exec_id, &input.file_in, input.base_64)
            .await?;
        Ok(BlockOutput::single("file_out", stored))
    }
}
