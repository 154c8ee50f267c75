use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use csv_normalize::{
    column::ColumnType,
    io_utils::{open_csv_reader, open_csv_writer},
    normalizer::Normalizer,
    schema::Schema,
    transform::TransformOptions,
};

fn generate_activity_log(rows: usize) -> String {
    let mut data = String::from("Timestamp,ZIP,FullName,FooDuration,BarDuration,TotalDuration\n");
    for i in 0..rows {
        let month = (i % 12) + 1;
        let day = (i % 28) + 1;
        let hour = (i % 12) + 1;
        let zip = i % 100_000;
        let meridiem = if i % 2 == 0 { "AM" } else { "PM" };
        data.push_str(&format!(
            "{month}/{day}/19 {hour}:15:00 {meridiem},{zip},first{i} LAST,{hour}:{:02}:{:02}.5,0:{:02}:10,\n",
            i % 60,
            (i * 7) % 60,
            i % 60,
        ));
    }
    data
}

fn activity_schema() -> Schema {
    Schema::new(vec![
        ColumnType::Timestamp,
        ColumnType::ZipCode,
        ColumnType::FullName,
        ColumnType::Duration,
        ColumnType::Duration,
        ColumnType::TotalDuration,
    ])
}

fn bench_normalize(c: &mut Criterion) {
    let rows = 10_000;
    let data = generate_activity_log(rows);
    let options = TransformOptions {
        timestamp_offset_hours: 3,
        ..TransformOptions::default()
    };

    let mut group = c.benchmark_group("normalize");
    group.throughput(Throughput::Elements(rows as u64));
    group.bench_function("activity_log_10k", |b| {
        b.iter_batched(
            || Normalizer::new(activity_schema(), options.clone()),
            |mut normalizer| {
                let mut reader = open_csv_reader(data.as_bytes(), b',');
                let mut output = Vec::with_capacity(data.len());
                let mut diagnostics = Vec::new();
                let mut writer = open_csv_writer(&mut output, b',');
                normalizer
                    .run(&mut reader, &mut writer, &mut diagnostics)
                    .expect("normalize run")
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
