//! Timeline walk: Step a glider, rewind, branch, and print each stage.
//!
//! Runs without a terminal UI:
//!
//! ```text
//! cargo run --example timeline_walk -- ring
//! ```

use lifeline::{patterns, rule, Grid, Strategy, Timeline};

fn print_grid(label: &str, timeline: &dyn Timeline) {
    println!(
        "{label}: generation {}/{} ({} live)",
        timeline.cursor() + 1,
        timeline.len(),
        timeline.current().alive_count()
    );
    for row in timeline.current().rows() {
        let line: String = row.iter().map(|&c| if c != 0 { 'O' } else { '.' }).collect();
        println!("  {line}");
    }
    println!();
}

fn step(timeline: &mut dyn Timeline, scratch: &mut Grid) -> Result<(), Box<dyn std::error::Error>> {
    rule::step(timeline.current(), scratch)?;
    timeline.push(scratch)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let strategy: Strategy = std::env::args()
        .nth(1)
        .map_or(Ok(Strategy::default()), |s| s.parse())?;

    let mut seed = Grid::new(8, 8)?;
    let glider = patterns::find("glider").ok_or("glider pattern missing")?;
    patterns::stamp(&mut seed, glider, 0, 0);

    println!("{strategy} timeline, capacity 6");
    println!();
    let mut timeline = strategy.build(&seed, 6)?;
    let mut scratch = Grid::new(8, 8)?;
    print_grid("seed", timeline.as_ref());

    for _ in 0..8 {
        step(timeline.as_mut(), &mut scratch)?;
    }
    print_grid("after 8 steps (oldest evicted)", timeline.as_ref());

    while timeline.back() {}
    print_grid("rewound to the oldest kept", timeline.as_ref());

    timeline.forward();
    let mut branch = timeline.current().clone();
    branch.toggle(7, 7);
    timeline.push(&branch)?;
    print_grid("branched (future discarded)", timeline.as_ref());

    Ok(())
}
