//! Benchmarks for building and aggregating location trees.
//!
//! Run with: `cargo bench -p stockyard-inventory`

use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use stockyard_core::{LocationId, StorageError};
use stockyard_inventory::{LocationKind, LocationReader, LocationRow, StockAggregator};

#[derive(Default)]
struct BenchStore {
    rows: HashMap<LocationId, LocationRow>,
    children: HashMap<LocationId, Vec<LocationRow>>,
    bin_stock: HashMap<String, u64>,
}

impl BenchStore {
    fn add(&mut self, parent: Option<LocationId>, name: String, kind: LocationKind) -> LocationId {
        let row = LocationRow::new(name, kind, 1_000);
        let id = row.id;
        if kind == LocationKind::Bin {
            self.bin_stock.insert(row.name.clone(), 5);
        }
        if let Some(parent) = parent {
            self.children.entry(parent).or_default().push(row.clone());
        }
        self.rows.insert(id, row);
        id
    }

    /// Warehouse with `zones` zones × `racks` racks × `bins` bins.
    fn wide(zones: usize, racks: usize, bins: usize) -> (Self, LocationId) {
        let mut store = Self::default();
        let root = store.add(None, "W".to_string(), LocationKind::Warehouse);
        for z in 0..zones {
            let zone = store.add(Some(root), format!("Z{z}"), LocationKind::Zone);
            for r in 0..racks {
                let rack = store.add(Some(zone), format!("Z{z}-R{r}"), LocationKind::Rack);
                for b in 0..bins {
                    store.add(Some(rack), format!("Z{z}-R{r}-B{b}"), LocationKind::Bin);
                }
            }
        }
        (store, root)
    }

    /// A single chain of `depth` zones ending in one bin.
    fn deep(depth: usize) -> (Self, LocationId) {
        let mut store = Self::default();
        let root = store.add(None, "W".to_string(), LocationKind::Warehouse);
        let mut parent = root;
        for d in 0..depth {
            parent = store.add(Some(parent), format!("Z{d}"), LocationKind::Zone);
        }
        store.add(Some(parent), "leaf".to_string(), LocationKind::Bin);
        (store, root)
    }
}

impl LocationReader for BenchStore {
    fn fetch_location(&self, id: LocationId) -> Result<Option<LocationRow>, StorageError> {
        Ok(self.rows.get(&id).cloned())
    }

    fn fetch_children(&self, id: LocationId) -> Result<Vec<LocationRow>, StorageError> {
        Ok(self.children.get(&id).cloned().unwrap_or_default())
    }

    fn fetch_bin_stock(&self, bin_name: &str) -> Result<u64, StorageError> {
        Ok(self.bin_stock.get(bin_name).copied().unwrap_or(0))
    }

    fn fetch_warehouses(&self) -> Result<Vec<LocationRow>, StorageError> {
        Ok(Vec::new())
    }
}

fn bench_wide_summary(c: &mut Criterion) {
    let mut group = c.benchmark_group("wide_summary");
    for bins in [4usize, 16, 64] {
        let (store, root) = BenchStore::wide(8, 8, bins);
        group.bench_with_input(BenchmarkId::from_parameter(bins), &bins, |b, _| {
            let aggregator = StockAggregator::new(&store);
            b.iter(|| black_box(aggregator.summary(root).unwrap()));
        });
    }
    group.finish();
}

fn bench_deep_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_build");
    for depth in [10usize, 100, 1_000] {
        let (store, root) = BenchStore::deep(depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            let aggregator = StockAggregator::new(&store).with_max_depth(depth + 1);
            b.iter(|| {
                let tree = aggregator.load(root).unwrap();
                black_box(aggregator.total_stock(&tree).unwrap())
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_wide_summary, bench_deep_build);
criterion_main!(benches);
