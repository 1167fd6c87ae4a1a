//! Tests for event ordering and depth/top-of-book update emission.

#[cfg(test)]
mod tests {
    use crate::orderbook::tests::support::*;
    use crate::orderbook::OrderBook;
    use crate::simple::SimpleOrder;

    #[test]
    fn test_accept_then_summary_events() {
        let mut book: OrderBook<SimpleOrder> = OrderBook::new("TEST");
        let bid0 = buy(1250, 100);
        let mut listener = TestListener::new();
        book.submit(&bid0, &mut listener);

        assert_eq!(
            listener.events,
            vec![
                Recorded::Accept(bid0.id()),
                Recorded::DepthChange,
                Recorded::BboChange,
            ]
        );
    }

    #[test]
    fn test_below_top_change_has_no_bbo_update() {
        let mut book: OrderBook<SimpleOrder> = OrderBook::new("TEST");
        add_and_verify(&mut book, &buy(1250, 100), false, false);

        let bid1 = buy(1249, 100);
        let mut listener = TestListener::new();
        book.submit(&bid1, &mut listener);
        assert_eq!(
            listener.events,
            vec![Recorded::Accept(bid1.id()), Recorded::DepthChange]
        );
    }

    #[test]
    fn test_market_order_produces_no_depth_events() {
        let mut book: OrderBook<SimpleOrder> = OrderBook::new("TEST");
        let market_bid = buy(0, 100);
        let mut listener = TestListener::new();
        book.submit(&market_bid, &mut listener);
        assert_eq!(listener.events, vec![Recorded::Accept(market_bid.id())]);
    }

    #[test]
    fn test_structural_events_precede_summary_events() {
        let mut book: OrderBook<SimpleOrder> = OrderBook::new("TEST");
        let ask0 = sell(1251, 100);
        add_and_verify(&mut book, &ask0, false, false);

        let inbound = buy(1251, 100);
        let mut listener = TestListener::new();
        book.submit(&inbound, &mut listener);
        assert_eq!(
            listener.events,
            vec![
                Recorded::Accept(inbound.id()),
                Recorded::Fill(inbound.id(), 100, 1251),
                Recorded::Fill(ask0.id(), 100, 1251),
                Recorded::DepthChange,
                Recorded::BboChange,
            ]
        );
    }

    #[test]
    fn test_cancel_reject_produces_single_event() {
        let mut book: OrderBook<SimpleOrder> = OrderBook::new("TEST");
        let stranger = buy(1250, 100);
        let mut listener = TestListener::new();
        book.cancel(&stranger, &mut listener);
        assert_eq!(
            listener.events,
            vec![Recorded::CancelReject(stranger.id(), "not found".into())]
        );
    }

    #[test]
    fn test_fill_pair_emitted_inbound_first() {
        let mut book: OrderBook<SimpleOrder> = OrderBook::new("TEST");
        let ask0 = sell(1251, 300);
        add_and_verify(&mut book, &ask0, false, false);

        let inbound = buy(1251, 100);
        let mut listener = TestListener::new();
        book.submit(&inbound, &mut listener);
        let fills = listener.fills();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0].0, inbound.id());
        assert_eq!(fills[1].0, ask0.id());
    }

    #[test]
    fn test_queue_drained_between_commands() {
        let mut book: OrderBook<SimpleOrder> = OrderBook::new("TEST");
        let bid0 = buy(1250, 100);
        let mut first = TestListener::new();
        book.submit(&bid0, &mut first);
        let first_len = first.events.len();

        // The next command delivers only its own events.
        let bid1 = buy(1249, 100);
        let mut second = TestListener::new();
        book.submit(&bid1, &mut second);
        assert_eq!(first.events.len(), first_len);
        assert!(second.events.iter().all(|e| match e {
            Recorded::Accept(id) => *id == bid1.id(),
            Recorded::DepthChange | Recorded::BboChange => true,
            _ => false,
        }));
    }

    #[test]
    fn test_deep_change_within_window_updates_depth_only_once() {
        let mut book: OrderBook<SimpleOrder> = OrderBook::new("TEST");
        for price in [1250u64, 1249, 1248, 1247, 1246] {
            add_and_verify(&mut book, &buy(price, 100), false, false);
        }

        // A sixth level outside the window produces no depth events at all.
        let hidden = buy(1245, 100);
        let mut listener = TestListener::new();
        book.submit(&hidden, &mut listener);
        assert_eq!(listener.events, vec![Recorded::Accept(hidden.id())]);
    }
}
