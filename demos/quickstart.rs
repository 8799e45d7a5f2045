use eternal_timestamp::{approx_delta, PackedTimestamp, SystemClock};

fn main() -> Result<(), eternal_timestamp::Error> {
    let now = PackedTimestamp::now(&SystemClock)?;
    let dinosaurs = PackedTimestamp::prehistoric()
        .year(-66_000_000)
        .precision(5)
        .build();
    let some_fifteenth = PackedTimestamp::modern().day(15).build();

    println!("now:        {now:#}");
    println!("raw:        {:#018x}", now.bits());
    println!("expanded:   {:?}", now.expand());
    println!("etdb real:  {}", now.to_etdb_real()?);
    println!("dinosaurs:  {dinosaurs}");
    println!("since then: {}", approx_delta(now, dinosaurs));
    println!("partial:    {some_fifteenth}");
    Ok(())
}
