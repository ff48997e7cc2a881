//! CSV生成（ガイド別合計）

use super::GUIDE_TABLE_HEADERS;
use crate::aggregator::GuideAggregate;
use crate::error::{Error, Result};

/// ガイド別合計をCSVバッファに生成
pub fn generate_csv_buffer(guides: &[GuideAggregate]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(GUIDE_TABLE_HEADERS)
        .map_err(|e| Error::Csv(e.to_string()))?;

    for guide in guides {
        let total = format!("{:.2}", guide.total);
        writer
            .write_record([
                guide.guide_id.as_deref().unwrap_or(""),
                guide.convenio_key.as_str(),
                total.as_str(),
                guide.channel.map(|c| c.as_str()).unwrap_or(""),
            ])
            .map_err(|e| Error::Csv(e.to_string()))?;
    }

    writer.into_inner().map_err(|e| Error::Csv(e.to_string()))
}
