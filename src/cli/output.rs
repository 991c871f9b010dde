//! Output formatting for CLI tools.
//!
//! Supports human-readable, JSON, and raw output formats.

use crate::cli::args::OutputFormat;
use crate::cli::hints;
use crate::supplies::Supplies;
use crate::{DataElements, MessagePdu, Oid, Value, VarBind};
use serde::Serialize;
use std::io::{self, Write};

/// One decoded message, ready for output.
#[derive(Debug, Serialize)]
pub struct MessageReport {
    pub source: String,
    pub size: usize,
    pub model: String,
    pub version: String,
    pub security_model: String,
    pub security_name: String,
    pub security_level: String,
    pub pdu_type: String,
    pub request_id: i32,
    pub error_status: String,
    pub error_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_engine_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_name: Option<String>,
    pub varbinds: Vec<VarBindResult>,
}

/// A single varbind result.
#[derive(Debug, Serialize)]
pub struct VarBindResult {
    pub oid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(rename = "type")]
    pub value_type: String,
    pub value: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_hex: Option<String>,
}

/// One merged supply row.
#[derive(Debug, Serialize)]
pub struct SupplyResult {
    pub channel: String,
    pub index: u32,
    pub level: Option<i32>,
    pub max_capacity: Option<i32>,
    pub unit: Option<String>,
    pub percent: Option<u8>,
}

/// Output context for formatting.
pub struct OutputContext {
    pub format: OutputFormat,
    pub show_hints: bool,
    pub force_hex: bool,
}

impl OutputContext {
    /// Create a new output context with default settings.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            show_hints: true,
            force_hex: false,
        }
    }

    /// Build the report for a decoded message of `size` bytes.
    pub fn build_report(&self, elements: &DataElements, size: usize) -> MessageReport {
        let pdu = elements.pdu.pdu();
        let (context_engine_id, context_name) = match &elements.pdu {
            MessagePdu::Scoped(scoped) => (
                Some(hex_string(&scoped.context_engine_id)),
                Some(String::from_utf8_lossy(&scoped.context_name).into_owned()),
            ),
            MessagePdu::Plain(_) => (None, None),
        };

        MessageReport {
            source: elements.state_reference.address().to_string(),
            size,
            model: elements.model.to_string(),
            version: elements.version.to_string(),
            security_model: elements.security_model.to_string(),
            security_name: display_bytes(&elements.security_name),
            security_level: elements.security_level.to_string(),
            pdu_type: pdu.pdu_type.to_string(),
            request_id: pdu.request_id,
            error_status: pdu.error_status_enum().to_string(),
            error_index: pdu.error_index,
            context_engine_id,
            context_name,
            varbinds: pdu.varbinds.iter().map(|vb| self.format_varbind(vb)).collect(),
        }
    }

    /// Write decoded messages to stdout.
    pub fn write_messages(&self, reports: &[MessageReport]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        match self.format {
            OutputFormat::Human => self.write_human(&mut stdout, reports),
            OutputFormat::Json => write_json(&mut stdout, reports),
            OutputFormat::Raw => self.write_raw(&mut stdout, reports),
        }
    }

    /// Write a supplies summary to stdout.
    pub fn write_supplies(&self, supplies: &Supplies) -> io::Result<()> {
        let rows: Vec<SupplyResult> = supplies
            .iter()
            .map(|(channel, record)| SupplyResult {
                channel: channel.to_string(),
                index: channel.index(),
                level: record.level,
                max_capacity: record.max_capacity,
                unit: record
                    .unit_name()
                    .map(String::from)
                    .or_else(|| record.unit.map(|u| u.to_string())),
                percent: record.percent(),
            })
            .collect();

        let mut stdout = io::stdout().lock();
        match self.format {
            OutputFormat::Json => write_json(&mut stdout, &rows),
            OutputFormat::Raw => {
                for row in &rows {
                    writeln!(
                        stdout,
                        "{}\t{}\t{}",
                        row.index,
                        opt(row.level),
                        opt(row.max_capacity)
                    )?;
                }
                Ok(())
            }
            OutputFormat::Human => {
                for row in &rows {
                    write!(stdout, "{:<20} ", row.channel)?;
                    match row.percent {
                        Some(pct) => write!(stdout, "{:>3}%", pct)?,
                        None => write!(stdout, "   ?")?,
                    }
                    write!(
                        stdout,
                        "  ({} / {}",
                        opt(row.level),
                        opt(row.max_capacity)
                    )?;
                    if let Some(unit) = &row.unit {
                        write!(stdout, " {}", unit)?;
                    }
                    writeln!(stdout, ")")?;
                }
                Ok(())
            }
        }
    }

    fn format_varbind(&self, vb: &VarBind) -> VarBindResult {
        let hint = if self.show_hints {
            hints::lookup(&vb.oid)
        } else {
            None
        };

        let (value_type, value, formatted, raw_hex) = format_value(&vb.value, self.force_hex);

        VarBindResult {
            oid: format_oid(&vb.oid),
            hint,
            value_type,
            value,
            formatted,
            raw_hex,
        }
    }

    fn write_human<W: Write>(&self, w: &mut W, reports: &[MessageReport]) -> io::Result<()> {
        for (i, report) in reports.iter().enumerate() {
            if i > 0 {
                writeln!(w)?;
            }
            writeln!(
                w,
                "{} {} from {} ({} bytes)",
                report.version, report.pdu_type, report.source, report.size
            )?;
            writeln!(
                w,
                "  request-id {}, {} (index {}), security {} {}",
                report.request_id,
                report.error_status,
                report.error_index,
                report.security_model,
                report.security_level
            )?;
            if let Some(name) = &report.context_name {
                writeln!(
                    w,
                    "  context \"{}\" engine {}",
                    name,
                    report.context_engine_id.as_deref().unwrap_or("")
                )?;
            }

            for vb in &report.varbinds {
                if let Some(ref hint) = vb.hint {
                    write!(w, "{} ({})", vb.oid, hint)?;
                } else {
                    write!(w, "{}", vb.oid)?;
                }

                write!(w, " = {}: ", vb.value_type)?;

                if let Some(ref formatted) = vb.formatted {
                    writeln!(w, "{}", formatted)?;
                } else {
                    match &vb.value {
                        serde_json::Value::String(s) => writeln!(w, "\"{}\"", s)?,
                        serde_json::Value::Null => writeln!(w)?,
                        other => writeln!(w, "{}", other)?,
                    }
                }
            }
        }
        Ok(())
    }

    fn write_raw<W: Write>(&self, w: &mut W, reports: &[MessageReport]) -> io::Result<()> {
        for vb in reports.iter().flat_map(|r| &r.varbinds) {
            let value_str = match &vb.value {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            writeln!(w, "{}\t{}", vb.oid, value_str)?;
        }
        Ok(())
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    writeln!(w, "{}", json)
}

fn opt(v: Option<i32>) -> String {
    v.map_or_else(|| "-".into(), |v| v.to_string())
}

/// Write message header and per-varbind details to stderr.
pub fn write_verbose_message(elements: &DataElements, wire: &[u8], show_hints: bool) {
    let mut stderr = std::io::stderr().lock();
    let pdu = elements.pdu.pdu();
    let _ = writeln!(stderr, "--- Message ---");
    let _ = writeln!(stderr, "Source:    {}", elements.state_reference.address());
    let _ = writeln!(stderr, "Model:     {}", elements.model);
    let _ = writeln!(stderr, "Version:   {}", elements.version);
    let _ = writeln!(
        stderr,
        "Security:  {} {} name {}",
        elements.security_model,
        elements.security_level,
        display_bytes(&elements.security_name)
    );
    let _ = writeln!(stderr, "Handle:    {}", elements.handle);
    let _ = writeln!(stderr, "Max resp:  {} bytes", elements.max_response_size);
    let _ = writeln!(stderr, "PDU:       {}", pdu.pdu_type);
    let _ = writeln!(
        stderr,
        "  Error:   {} (index {})",
        pdu.error_status_enum(),
        pdu.error_index
    );
    let _ = writeln!(stderr, "Wire:      {} bytes", wire.len());
    for chunk in wire.chunks(16) {
        let _ = writeln!(stderr, "  {}", format_hex_string(chunk));
    }
    let _ = writeln!(stderr, "Varbinds:  {} total", pdu.varbinds.len());
    for vb in &pdu.varbinds {
        write_verbose_varbind(&mut stderr, vb, show_hints);
    }
    let _ = writeln!(stderr);
}

/// Write detailed varbind information for verbose output.
fn write_verbose_varbind<W: Write>(w: &mut W, vb: &VarBind, show_hints: bool) {
    let hint = if show_hints {
        hints::lookup(&vb.oid)
    } else {
        None
    };
    if let Some(h) = hint {
        let _ = writeln!(w, "  {} ({})", format_oid(&vb.oid), h);
    } else {
        let _ = writeln!(w, "  {}", format_oid(&vb.oid));
    }

    let (type_name, decoded, raw_hex, size) = format_verbose_value(&vb.value);

    let _ = writeln!(w, "    Type:    {}", type_name);
    let _ = writeln!(w, "    Value:   {}", decoded);

    if let Some(hex) = raw_hex {
        let _ = writeln!(w, "    Raw:     {}", hex);
    }

    if let Some(s) = size {
        let _ = writeln!(w, "    Size:    {} bytes", s);
    }
}

/// Format a value for verbose output, returning (type_name, decoded_value, raw_hex, size).
fn format_verbose_value(value: &Value) -> (String, String, Option<String>, Option<usize>) {
    match value {
        Value::OctetString(bytes) => {
            let raw_hex = format_hex_string(bytes);
            if is_printable(bytes) {
                let decoded = String::from_utf8_lossy(bytes);
                (
                    "STRING".into(),
                    format!("\"{}\"", decoded),
                    Some(raw_hex),
                    Some(bytes.len()),
                )
            } else {
                (
                    "Hex-STRING".into(),
                    raw_hex.clone(),
                    Some(raw_hex),
                    Some(bytes.len()),
                )
            }
        }
        Value::ObjectIdentifier(oid) => {
            let s = format_oid(oid);
            let decoded = match hints::lookup(oid) {
                Some(h) => format!("{} ({})", s, h),
                None => s,
            };
            ("OID".into(), decoded, None, None)
        }
        Value::Opaque(bytes) | Value::Unknown { data: bytes, .. } => {
            let (type_name, _, _, _) = format_value(value, false);
            let raw_hex = format_hex_string(bytes);
            (type_name, raw_hex.clone(), Some(raw_hex), Some(bytes.len()))
        }
        other => {
            let (type_name, json, formatted, _) = format_value(other, false);
            let decoded = formatted.unwrap_or_else(|| json.to_string());
            (type_name, decoded, None, None)
        }
    }
}

/// Format an OID as dotted string.
fn format_oid(oid: &Oid) -> String {
    oid.to_string()
}

/// Format a value, returning (type_name, json_value, formatted_string, raw_hex).
fn format_value(
    value: &Value,
    force_hex: bool,
) -> (String, serde_json::Value, Option<String>, Option<String>) {
    match value {
        Value::Integer(v) => ("INTEGER".into(), (*v).into(), None, None),

        Value::OctetString(bytes) => {
            let raw_hex = hex_string(bytes);

            if force_hex || !is_printable(bytes) {
                (
                    "Hex-STRING".into(),
                    serde_json::Value::String(raw_hex.clone()),
                    Some(format_hex_string(bytes)),
                    Some(raw_hex),
                )
            } else {
                let s = String::from_utf8_lossy(bytes);
                (
                    "STRING".into(),
                    serde_json::Value::String(s.into_owned()),
                    None,
                    Some(raw_hex),
                )
            }
        }

        Value::Null => ("NULL".into(), serde_json::Value::Null, None, None),

        Value::ObjectIdentifier(oid) => (
            "OID".into(),
            serde_json::Value::String(format_oid(oid)),
            None,
            None,
        ),

        Value::IpAddress(bytes) => {
            let s = std::net::Ipv4Addr::from(*bytes).to_string();
            ("IpAddress".into(), serde_json::Value::String(s), None, None)
        }

        Value::Counter32(v) => ("Counter32".into(), (*v).into(), None, None),

        Value::Gauge32(v) => ("Gauge32".into(), (*v).into(), None, None),

        Value::TimeTicks(v) => (
            "TimeTicks".into(),
            (*v).into(),
            Some(format!("({}) {}", v, format_timeticks(*v))),
            None,
        ),

        Value::Opaque(bytes) => {
            let hex = hex_string(bytes);
            (
                "Opaque".into(),
                serde_json::Value::String(hex.clone()),
                Some(format_hex_string(bytes)),
                Some(hex),
            )
        }

        Value::Counter64(v) => ("Counter64".into(), (*v).into(), None, None),

        Value::NoSuchObject => (
            "NoSuchObject".into(),
            serde_json::Value::Null,
            Some("No Such Object available".into()),
            None,
        ),

        Value::NoSuchInstance => (
            "NoSuchInstance".into(),
            serde_json::Value::Null,
            Some("No Such Instance currently exists".into()),
            None,
        ),

        Value::EndOfMibView => (
            "EndOfMibView".into(),
            serde_json::Value::Null,
            Some("No more variables left in this MIB View".into()),
            None,
        ),

        Value::Unknown { tag, data } => {
            let hex = hex_string(data);
            (
                format!("Unknown(0x{:02X})", tag),
                serde_json::Value::String(hex.clone()),
                Some(format_hex_string(data)),
                Some(hex),
            )
        }
    }
}

/// Printable text as-is, anything else as hex.
fn display_bytes(bytes: &[u8]) -> String {
    if is_printable(bytes) {
        String::from_utf8_lossy(bytes).into_owned()
    } else {
        hex_string(bytes)
    }
}

/// Check if bytes are printable ASCII/UTF-8.
fn is_printable(bytes: &[u8]) -> bool {
    match std::str::from_utf8(bytes) {
        Ok(s) => s
            .chars()
            .all(|c| c.is_ascii_graphic() || c.is_ascii_whitespace()),
        Err(_) => false,
    }
}

/// Format bytes as hex string (lowercase, no separator).
fn hex_string(bytes: &[u8]) -> String {
    crate::util::encode_hex(bytes)
}

/// Format bytes as spaced hex for display.
fn format_hex_string(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format TimeTicks as human-readable duration.
fn format_timeticks(centiseconds: u32) -> String {
    let total_seconds = centiseconds / 100;
    let cs = centiseconds % 100;

    let days = total_seconds / 86400;
    let hours = (total_seconds % 86400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if days > 0 {
        format!(
            "{}d {:02}:{:02}:{:02}.{:02}",
            days, hours, minutes, seconds, cs
        )
    } else {
        format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, cs)
    }
}

/// Write an error message to stderr.
pub fn write_error(err: &crate::Error) {
    eprintln!("Error: {}", err);
}
