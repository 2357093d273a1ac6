//! Scene → movie record.

use stashnfo_common::Result;

use super::{fields, MappingContext};
use crate::model::NfoRecord;

pub(super) fn convert(ctx: &mut MappingContext<'_>) -> Result<NfoRecord> {
    let mut record = NfoRecord::new();

    ctx.push_titles(&mut record);
    record.push_opt("plot", ctx.text("details"));
    record.push_opt("tagline", ctx.text("tagline"));
    ctx.push_rating(&mut record)?;
    ctx.push_release_date(&mut record);
    if let Some(minutes) = fields::runtime_minutes(ctx.source)? {
        record.push_text("runtime", minutes.to_string());
    }
    ctx.push_studio(&mut record);
    ctx.push_unique_id(&mut record);
    ctx.push_tags(&mut record);
    ctx.push_actors(&mut record);
    ctx.push_images(&mut record)?;

    Ok(record)
}
