use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use csv::{ReaderBuilder, WriterBuilder};

use crate::types::{CharacterBuffer, PenEvent, PenState, Sample};

/// Cabecera de las grabaciones de eventos de lápiz
pub const RECORDING_HEADER: [&str; 4] = ["t_ms", "event", "x", "y"];

/// Carga una grabación `t_ms,event,x,y` (event = down|move|up) desde un fichero
pub fn load_events_from_csv(path: impl AsRef<Path>) -> Result<Vec<PenEvent>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("No se pudo abrir el CSV {:?}", path))?;
    read_events(file).with_context(|| format!("CSV inválido: {:?}", path))
}

/// Lee eventos desde cualquier lector (fichero, stdin, memoria)
pub fn read_events(reader: impl Read) -> Result<Vec<PenEvent>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut events = Vec::new();
    let mut last_t = 0u64;

    for (row_idx, result) in reader.records().enumerate() {
        let row = row_idx + 1;
        let record = result.with_context(|| format!("Fila {} inválida", row))?;
        if record.len() < 4 {
            bail!("La fila {} no tiene 4 columnas", row);
        }

        let t_ms: u64 = record[0]
            .parse()
            .with_context(|| format!("t_ms inválido en fila {}", row))?;
        let kind: PenState = record[1]
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("event inválido en fila {}", row))?;
        let x: i32 = record[2]
            .parse()
            .with_context(|| format!("x inválido en fila {}", row))?;
        let y: i32 = record[3]
            .parse()
            .with_context(|| format!("y inválido en fila {}", row))?;

        ensure!(
            t_ms >= last_t,
            "Marca temporal decreciente en fila {} ({} < {})",
            row,
            t_ms,
            last_t
        );
        last_t = t_ms;

        events.push(PenEvent::new(t_ms, kind, x, y));
    }

    Ok(events)
}

/// Escribe eventos en el mismo formato que `read_events`
pub fn write_events(writer: impl Write, events: &[PenEvent]) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    writer.write_record(RECORDING_HEADER)?;
    for ev in events {
        writer.write_record([
            ev.t_ms.to_string(),
            ev.kind.to_string(),
            ev.x.to_string(),
            ev.y.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn save_events_to_csv(path: impl AsRef<Path>, events: &[PenEvent]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("No se pudo crear {:?}", path))?;
    write_events(file, events)
}

/// Toda la grabación como un único carácter, ignorando pausas
pub fn events_as_character(events: &[PenEvent]) -> CharacterBuffer {
    events
        .iter()
        .map(|ev| Sample::new(ev.x, ev.y, ev.kind))
        .collect()
}

/// Carga una grabación y la trata como un único carácter
pub fn load_character_from_csv(path: impl AsRef<Path>) -> Result<CharacterBuffer> {
    let events = load_events_from_csv(path)?;
    ensure!(!events.is_empty(), "La grabación no contiene eventos");
    Ok(events_as_character(&events))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORDING: &str = "t_ms,event,x,y\n\
        0,down,10,10\n\
        16,move,12,14\n\
        32,up,15,20\n\
        4000,down,80,10\n\
        4016,up,90,40\n";

    #[test]
    fn test_read_events() {
        let events = read_events(RECORDING.as_bytes()).unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0], PenEvent::new(0, PenState::Down, 10, 10));
        assert_eq!(events[4], PenEvent::new(4016, PenState::Up, 90, 40));
    }

    #[test]
    fn test_write_then_read() {
        let events = read_events(RECORDING.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_events(&mut buf, &events).unwrap();
        assert_eq!(String::from_utf8(buf.clone()).unwrap(), RECORDING);
        assert_eq!(read_events(buf.as_slice()).unwrap(), events);
    }

    #[test]
    fn test_bad_rows_are_reported() {
        let err = read_events("t_ms,event,x,y\n0,hover,1,1\n".as_bytes()).unwrap_err();
        assert!(format!("{:#}", err).contains("fila 1"));

        let err = read_events("t_ms,event,x,y\n10,down,1,1\n5,up,1,1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("decreciente"));

        assert!(read_events("t_ms,event,x,y\n0,down,1\n".as_bytes()).is_err());
    }

    #[test]
    fn test_events_as_character() {
        let events = read_events(RECORDING.as_bytes()).unwrap();
        let character = events_as_character(&events);
        let flags: Vec<u8> = character.iter().map(|s| s.pen.flag()).collect();
        assert_eq!(flags, vec![1, 1, 0, 1, 0]);
    }
}
