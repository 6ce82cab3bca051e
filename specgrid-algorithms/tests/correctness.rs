use specgrid_algorithms::{add_bin_max, add_peak_counts, transform, PeakConfig};
use specgrid_core::{RawModule, PIXEL_COUNT};

fn generate_module(bin_count: usize) -> RawModule {
    // Pixel p gets a flat spectrum of ones with a spike of height p at bin
    // p % bin_count, so every pixel has a distinct, known total.
    let rows: Vec<Vec<u64>> = (0..PIXEL_COUNT)
        .map(|p| {
            let mut bins = vec![1u64; bin_count];
            bins[p % bin_count] += p as u64;
            bins
        })
        .collect();
    RawModule {
        marker_row: 7,
        bin_columns: (0..bin_count).map(|i| format!("bin_{i}")).collect(),
        index_values: (1..=PIXEL_COUNT).map(|i| i.to_string()).collect(),
        rows,
    }
}

#[test]
fn test_transform_invariants() {
    let module = generate_module(40);
    let table = transform(&module).unwrap();

    assert_eq!(table.len(), PIXEL_COUNT);
    for (position, record) in table.records().iter().enumerate() {
        assert_eq!(record.pixel_id as usize, position + 1);
        assert_eq!(record.total_count, 40 + position as u64);
        assert_eq!(
            record.is_edge,
            record.x_index() == 1
                || record.x_index() == 11
                || record.y_index() == 1
                || record.y_index() == 11
        );
    }
    assert_eq!(table.edge_records().count(), 40);

    // Max pixel normalizes to exactly 1.0.
    let max_record = table.get(121).unwrap();
    assert!((max_record.total_counts_norm - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_peak_passes_compose() {
    let module = generate_module(40);
    let mut table = transform(&module).unwrap();

    let config = PeakConfig::new(20).with_bin_width(10).with_threshold(5);
    add_peak_counts(&mut table, config.window());
    add_bin_max(&mut table, config.window(), config.threshold.unwrap());

    for record in table.records() {
        let peak = record.peak_count.unwrap();
        let non_peak = record.non_peak_count.unwrap();
        assert_eq!(peak + non_peak, record.total_count);

        let bin_max = record.bin_max.unwrap();
        let height = record.peak_height.unwrap();
        let spike_bin = (record.pixel_id as usize - 1) % 40;
        if (10..30).contains(&spike_bin) && height >= 5 {
            // Spike inside the window and above threshold: true argmax.
            assert_eq!(bin_max, spike_bin);
        } else if height < 5 {
            // Sub-threshold window: sentinel at the window's lower bound.
            assert_eq!(bin_max, 10);
        }
    }
}

#[test]
fn test_transform_twice_is_identical() {
    let module = generate_module(16);
    assert_eq!(transform(&module).unwrap(), transform(&module).unwrap());
}
