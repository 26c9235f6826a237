#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::{
        app::calc::{breadth, canonical_order, grid_layout, sector_aggregate, top_movers},
        error::GridOverflow,
        models::QuoteBasket,
        test::stub::{numbered_basket, quote},
    };

    fn set_sample_data() -> QuoteBasket {
        [
            quote("A", "Tech", dec!(105), dec!(100)),
            quote("B", "Banking", dec!(98), dec!(100)),
            quote("C", "Tech", dec!(100), dec!(100)),
        ]
        .into_iter()
        .collect()
    }

    fn symbols_of(quotes: &[crate::models::Quote]) -> Vec<&str> {
        quotes.iter().map(|q| q.symbol().as_str()).collect()
    }

    #[test]
    fn breadth_counts_each_direction() {
        let basket = set_sample_data();
        let result = breadth(&basket);

        assert_eq!(*result.advancing(), 1);
        assert_eq!(*result.declining(), 1);
        assert_eq!(*result.unchanged(), 1);
        assert_eq!(result.total(), basket.len());
    }

    #[test]
    fn movers_rank_gainers_and_losers() {
        let basket = set_sample_data();
        let movers = top_movers(&basket, 2);

        assert_eq!(symbols_of(movers.gainers()), vec!["A", "C"]);
        assert_eq!(symbols_of(movers.losers()), vec!["B", "C"]);
        assert_eq!(*movers.gainers()[0].change_pct(), dec!(5));
        assert_eq!(*movers.losers()[0].change_pct(), dec!(-2));
    }

    #[test]
    fn movers_are_capped_by_basket_size() {
        let basket = set_sample_data();
        let movers = top_movers(&basket, 10);

        assert_eq!(movers.gainers().len(), 3);
        assert_eq!(movers.losers().len(), 3);
        assert!(top_movers(&basket, 0).gainers().is_empty());
    }

    #[test]
    fn ties_are_broken_by_symbol() {
        let basket: QuoteBasket = [
            quote("ZED", "Tech", dec!(110), dec!(100)),
            quote("ALPHA", "Tech", dec!(110), dec!(100)),
            quote("MID", "Tech", dec!(90), dec!(100)),
        ]
        .into_iter()
        .collect();

        let order: Vec<&str> = canonical_order(&basket)
            .iter()
            .map(|q| q.symbol().as_str())
            .collect();
        assert_eq!(order, vec!["ALPHA", "ZED", "MID"]);

        let movers = top_movers(&basket, 3);
        assert_eq!(symbols_of(movers.losers()), vec!["MID", "ALPHA", "ZED"]);
    }

    #[test]
    fn sector_mean_per_sector() {
        let basket: QuoteBasket = [
            quote("X", "Tech", dec!(104), dec!(100)),
            quote("Y", "Tech", dec!(98), dec!(100)),
            quote("Z", "Banking", dec!(101), dec!(100)),
        ]
        .into_iter()
        .collect();

        let sectors = sector_aggregate(&basket);

        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors["Tech"], dec!(1));
        assert_eq!(sectors["Banking"], dec!(1));
    }

    #[test]
    fn aggregates_are_idempotent() {
        let basket = numbered_basket(12);

        assert_eq!(breadth(&basket), breadth(&basket));
        assert_eq!(sector_aggregate(&basket), sector_aggregate(&basket));
        assert_eq!(top_movers(&basket, 5), top_movers(&basket, 5));
        assert_eq!(grid_layout(&basket, 3, 4), grid_layout(&basket, 3, 4));
    }

    #[test]
    fn empty_basket_aggregates() {
        let basket = QuoteBasket::new();

        assert_eq!(breadth(&basket).total(), 0);
        assert!(sector_aggregate(&basket).is_empty());
        assert!(top_movers(&basket, 5).gainers().is_empty());

        let grid = grid_layout(&basket, 2, 2).unwrap();
        assert!(grid.iter().flatten().all(|cell| cell.is_empty()));
    }

    #[test]
    fn grid_pads_trailing_cells() {
        let basket = numbered_basket(38);
        let grid = grid_layout(&basket, 8, 5).unwrap();

        assert_eq!(grid.len(), 8);
        assert!(grid.iter().all(|row| row.len() == 5));

        let cells: Vec<_> = grid.iter().flatten().collect();
        assert_eq!(cells.iter().filter(|cell| cell.is_empty()).count(), 2);
        assert!(cells[38].is_empty() && cells[39].is_empty());
        assert_eq!(*cells[39].change_pct(), Decimal::ZERO);

        // Row-major, best performer first.
        assert_eq!(cells[0].symbol().as_deref(), Some("S00"));
        assert_eq!(cells[5].symbol().as_deref(), Some("S05"));
        assert_eq!(cells[37].symbol().as_deref(), Some("S37"));
    }

    #[test]
    fn grid_overflow_is_an_error() {
        let basket = numbered_basket(41);
        let result = grid_layout(&basket, 8, 5);

        assert_eq!(
            result,
            Err(GridOverflow {
                rows: 8,
                cols: 5,
                capacity: 40,
                len: 41,
            })
        );
    }

    #[test]
    fn zero_previous_close_counts_as_unchanged() {
        let basket: QuoteBasket = [quote("NEW", "Tech", dec!(50), dec!(0))]
            .into_iter()
            .collect();

        let q = basket.get("NEW").unwrap();
        assert_eq!(*q.change(), dec!(50));
        assert_eq!(*q.change_pct(), Decimal::ZERO);
        assert_eq!(*breadth(&basket).unchanged(), 1);
    }

    #[test]
    fn sector_mean_survives_extreme_changes() {
        let basket: QuoteBasket = [
            quote("X", "Tech", dec!(500000000000000000000000000), dec!(1)),
            quote("Y", "Tech", dec!(500000000000000000000000000), dec!(1)),
        ]
        .into_iter()
        .collect();

        let pct = *basket.get("X").unwrap().change_pct();
        assert_eq!(pct, dec!(49999999999999999999999999900));

        let sectors = sector_aggregate(&basket);
        assert_eq!(sectors["Tech"], pct);
    }
}
