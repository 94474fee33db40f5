//! Collects a week of hourly vehicle volumes for every sensor in Oslo and prints the
//! busiest hours, the same data a map animation would step through.

use chrono::NaiveDate;
use std::io::Write;
use trafikkdata::{Progress, SearchFilter, TrafficClient, TrafficError, TrafficType};

#[tokio::main]
async fn main() -> Result<(), TrafficError> {
    let client = TrafficClient::builder().build()?;
    let filter = SearchFilter::builder()
        .traffic_type(TrafficType::Vehicle)
        .county_numbers([3].into())
        .is_operational(true)
        .build();
    let start = NaiveDate::from_ymd_opt(2019, 10, 24)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let stop = NaiveDate::from_ymd_opt(2019, 10, 31)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let mut report = |progress: Progress| {
        print!("\rDOWNLOADING - {:.1}%", progress.percent());
        std::io::stdout().flush().ok();
    };
    let snapshot = client.fetch_traffic(&filter, start, stop, &mut report).await?;
    println!();

    println!(
        "{} sensors, {} hours, max volume {}",
        snapshot.sensors.len(),
        snapshot.aggregate.len(),
        snapshot.max_volume
    );

    let mut busiest: Vec<_> = snapshot
        .aggregate
        .iter()
        .map(|frame| {
            let total: u64 = frame.readings.values().map(|point| point.volume).sum();
            (frame.hour, frame.readings.len(), total)
        })
        .collect();
    busiest.sort_by(|a, b| b.2.cmp(&a.2));
    for (hour, reporting, total) in busiest.iter().take(10) {
        println!("{hour}: {total} vehicles across {reporting} sensors");
    }

    Ok(())
}
