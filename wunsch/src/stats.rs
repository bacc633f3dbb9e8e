use std::{
    fmt::Debug,
    io::Write,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::anyhow;
use serde::Serialize;
use strum::{EnumCount, EnumIter, IntoEnumIterator};

#[repr(usize)]
#[derive(Clone, Copy, EnumIter, EnumCount)]
pub enum SerialTimed {
    Total,
    Reading,
    Alignment,
    Writing,
}

impl Debug for SerialTimed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            SerialTimed::Total => "total",
            SerialTimed::Reading => "reading",
            SerialTimed::Alignment => "alignment",
            SerialTimed::Writing => "writing",
        };

        write!(f, "{}", str)
    }
}

#[repr(usize)]
#[derive(Clone, Copy, EnumIter, EnumCount)]
pub enum CountedValue {
    Pairs,
    SkippedLines,
    Cells,
}

impl Debug for CountedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            CountedValue::Pairs => "pairs aligned",
            CountedValue::SkippedLines => "malformed lines skipped",
            CountedValue::Cells => "DP cells computed",
        };

        write!(f, "{}", str)
    }
}

/// The totals of one `wunsch align` run, as they appear in the stats output.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunTotals {
    pub pairs: u64,
    pub skipped_lines: u64,
    pub cells: u64,
    pub total_seconds: f64,
    pub reading_seconds: f64,
    pub alignment_seconds: f64,
    pub writing_seconds: f64,
}

#[derive(Clone, Default, Debug)]
pub struct Stats {
    serial_times: [Duration; SerialTimed::COUNT],
    counted_values: Arc<[AtomicU64; CountedValue::COUNT]>,
}

impl Stats {
    pub fn set_serial_time(&mut self, timed: SerialTimed, time: Duration) {
        self.serial_times[timed as usize] = time;
    }

    fn serial_time_total(&self, timed: SerialTimed) -> Duration {
        self.serial_times[timed as usize]
    }

    fn serial_time_pct(&self, timed: SerialTimed) -> f64 {
        let total_nanos = Self::nanos(self.serial_time_total(SerialTimed::Total)) as f64;
        let nanos = Self::nanos(self.serial_time_total(timed)) as f64;

        match total_nanos > 0.0 {
            true => nanos / total_nanos,
            false => 0.0,
        }
    }

    pub fn counted_value(&self, counted: CountedValue) -> u64 {
        self.counted_values[counted as usize].load(Ordering::SeqCst)
    }

    pub fn increment_count(&self, counted: CountedValue) {
        self.counted_values[counted as usize].fetch_add(1, Ordering::SeqCst);
    }

    pub fn add_count(&self, counted: CountedValue, count: usize) {
        self.counted_values[counted as usize].fetch_add(count as u64, Ordering::SeqCst);
    }

    pub fn totals(&self) -> RunTotals {
        RunTotals {
            pairs: self.counted_value(CountedValue::Pairs),
            skipped_lines: self.counted_value(CountedValue::SkippedLines),
            cells: self.counted_value(CountedValue::Cells),
            total_seconds: self.serial_time_total(SerialTimed::Total).as_secs_f64(),
            reading_seconds: self.serial_time_total(SerialTimed::Reading).as_secs_f64(),
            alignment_seconds: self.serial_time_total(SerialTimed::Alignment).as_secs_f64(),
            writing_seconds: self.serial_time_total(SerialTimed::Writing).as_secs_f64(),
        }
    }

    pub fn serial_string(&self, timed: SerialTimed) -> String {
        let width = format!(
            "{:.2}",
            self.serial_time_total(SerialTimed::Total).as_secs_f64()
        )
        .len();

        format!(
            "{:w$.2}s ({:>5.2}%)",
            self.serial_time_total(timed).as_secs_f64(),
            self.serial_time_pct(timed) * 100.0,
            w = width,
        )
    }

    pub fn write(&self, out: &mut impl Write) -> anyhow::Result<()> {
        writeln!(out, "summary statistics:")?;
        self.write_stats(out)?;
        writeln!(out)?;
        self.write_runtime(out)
    }

    pub fn write_stats(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let max_width = CountedValue::iter()
            .map(|c| format!("{c:?}: {}", Self::format_num(self.counted_value(c))).len())
            .max()
            .unwrap_or(0);

        let values: Vec<_> = CountedValue::iter().collect();
        values.iter().take(values.len() - 1).try_for_each(|c| {
            let label = format!("{c:?}");
            let label_width = label.len();
            let count = Self::format_num(self.counted_value(*c));
            writeln!(out, " ├─ {label}: {count:>w$}", w = max_width - label_width)
        })?;

        let last = values
            .last()
            .ok_or(anyhow!("no CountedValues in Stats::write_stats()"))?;
        let label = format!("{last:?}");
        let label_width = label.len();
        let count = Self::format_num(self.counted_value(*last));
        writeln!(out, " └─ {label}: {count:>w$}", w = max_width - label_width)?;

        Ok(())
    }

    pub fn write_runtime(&self, out: &mut impl Write) -> anyhow::Result<()> {
        writeln!(
            out,
            "runtime: {}",
            self.serial_string(SerialTimed::Total)
        )?;

        let label_width = SerialTimed::iter()
            .skip(1)
            .map(|t| format!("{t:?}:").len())
            .max()
            .unwrap_or(0);

        let timed: Vec<_> = SerialTimed::iter().skip(1).collect();
        timed.iter().enumerate().try_for_each(|(idx, t)| {
            let branch = match idx + 1 == timed.len() {
                true => "└─",
                false => "├─",
            };
            writeln!(
                out,
                " {branch} {:<w$} {}",
                format!("{t:?}:"),
                self.serial_string(*t),
                w = label_width
            )
        })?;

        Ok(())
    }

    pub fn nanos(time: Duration) -> u64 {
        // u64::MAX nanoseconds is several centuries
        time.as_nanos().min(u64::MAX as u128) as u64
    }

    pub fn format_num(num: u64) -> String {
        let num_str = num.to_string();
        let mut result = String::new();
        let len = num_str.len();

        for (i, ch) in num_str.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                result.push(',');
            }
            result.push(ch);
        }
        result
    }
}
