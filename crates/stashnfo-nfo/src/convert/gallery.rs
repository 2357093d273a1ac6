//! Gallery → album record.
//!
//! NFO has no gallery schema; galleries are written as movies, so the
//! entries here mirror the scene mapping minus runtime and tagline, plus the
//! gallery folder.

use stashnfo_common::Result;

use super::{fields, MappingContext};
use crate::model::NfoRecord;

pub(super) fn convert(ctx: &mut MappingContext<'_>) -> Result<NfoRecord> {
    let mut record = NfoRecord::new();

    ctx.push_titles(&mut record);
    record.push_opt("plot", ctx.text("details"));
    ctx.push_rating(&mut record)?;
    ctx.push_release_date(&mut record);
    ctx.push_studio(&mut record);
    ctx.push_unique_id(&mut record);
    ctx.push_tags(&mut record);
    ctx.push_actors(&mut record);
    record.push_opt("folder", fields::path_of(ctx.source, "folder"));
    ctx.push_images(&mut record)?;

    Ok(record)
}
