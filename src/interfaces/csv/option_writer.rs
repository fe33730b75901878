use crate::domain::gateway::GatewayOption;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct OptionRecord<'a> {
    label: &'a str,
    value: &'a str,
}

/// Writes gateway picker options as `label,value` CSV.
///
/// The default option is written with an empty value.
pub struct OptionWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> OptionWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_options(&mut self, options: &[GatewayOption]) -> Result<()> {
        for option in options {
            self.writer.serialize(OptionRecord {
                label: &option.label,
                value: option.value.as_ref().map_or("", |id| id.as_str()),
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
