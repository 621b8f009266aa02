use super::*;
use shared::error::ErrorCode;
use shared::order::{Order, OrderState};
use shared::util::now_millis;

fn test_order(estado: OrderState) -> Order {
    let agora = now_millis();
    Order {
        id: 1,
        numero: "AGC-2025-00001".to_string(),
        utilizador_id: 10,
        estado,
        subtotal: 1500.0,
        taxa_entrega: 0.0,
        desconto: 0.0,
        total: 1500.0,
        endereco_entrega: Some("Rangel, Luanda".to_string()),
        nota: None,
        pago_em: None,
        em_preparacao_em: None,
        em_transito_em: None,
        entregue_em: None,
        cancelado_em: None,
        version: 0,
        criado_em: agora,
        atualizado_em: agora,
    }
}

fn strict() -> TransitionPolicy {
    TransitionPolicy::default()
}

// ========================================================================
// Lifecycle
// ========================================================================

#[test]
fn test_transition_pendente_to_pago() {
    let order = test_order(OrderState::Pendente);

    let plan = plan_transition(strict(), &order, OrderState::Pago, None, "42")
        .unwrap()
        .expect("must produce a plan");

    assert_eq!(plan.de, OrderState::Pendente);
    assert_eq!(plan.para, OrderState::Pago);
    assert_eq!(plan.stamp_column, Some("pago_em"));
    assert!(plan.stamp_value > 0);
    assert_eq!(plan.historico.estado, OrderState::Pago);
    assert_eq!(plan.historico.actor, "42");
    assert_eq!(plan.expected_version, 0);
}

#[test]
fn test_transition_is_idempotent() {
    let order = test_order(OrderState::Pago);

    // Aplicar o estado actual outra vez: no-op, sem histórico novo
    let plan = plan_transition(strict(), &order, OrderState::Pago, None, "42").unwrap();
    assert!(plan.is_none());
}

#[test]
fn test_cancel_from_pendente() {
    let order = test_order(OrderState::Pendente);

    let plan = plan_transition(
        strict(),
        &order,
        OrderState::Cancelado,
        Some("cliente desistiu".to_string()),
        "sistema",
    )
    .unwrap()
    .expect("cancellation must be allowed from PENDENTE");

    assert_eq!(plan.para, OrderState::Cancelado);
    assert_eq!(plan.stamp_column, Some("cancelado_em"));
    assert_eq!(plan.historico.nota.as_deref(), Some("cliente desistiu"));
}

#[test]
fn test_illegal_jump_rejected() {
    let order = test_order(OrderState::Pendente);

    let err = plan_transition(strict(), &order, OrderState::Entregue, None, "42").unwrap_err();
    assert_eq!(err.code, ErrorCode::IllegalTransition);
}

#[test]
fn test_backward_transition_rejected_by_default() {
    let order = test_order(OrderState::EmTransito);

    let err = plan_transition(strict(), &order, OrderState::Pago, None, "42").unwrap_err();
    assert_eq!(err.code, ErrorCode::IllegalTransition);
}

#[test]
fn test_backward_transition_allowed_with_rollback_policy() {
    let policy = TransitionPolicy::new(true);
    let mut order = test_order(OrderState::EmTransito);
    order.pago_em = Some(order.criado_em);

    let plan = plan_transition(policy, &order, OrderState::Pago, None, "42")
        .unwrap()
        .expect("rollback policy must allow the jump");

    // Timestamp já estampado não é reescrito
    assert_eq!(plan.stamp_column, None);
    assert_eq!(plan.historico.estado, OrderState::Pago);
}

#[test]
fn test_terminal_states_closed_even_with_rollback() {
    let policy = TransitionPolicy::new(true);
    let order = test_order(OrderState::Entregue);

    let err = plan_transition(policy, &order, OrderState::Pendente, None, "42").unwrap_err();
    assert_eq!(err.code, ErrorCode::IllegalTransition);

    let cancelled = test_order(OrderState::Cancelado);
    assert!(plan_transition(policy, &cancelled, OrderState::Pago, None, "42").is_err());
}

#[test]
fn test_full_forward_flow() {
    let policy = strict();
    let flow = [
        OrderState::Pago,
        OrderState::EmPreparacao,
        OrderState::EmTransito,
        OrderState::Entregue,
    ];

    let mut order = test_order(OrderState::Pendente);
    for next in flow {
        let plan = plan_transition(policy, &order, next, None, "sistema")
            .unwrap()
            .unwrap_or_else(|| panic!("{} must be reachable", next));
        // Simula a aplicação do plano
        order.estado = plan.para;
        order.version += 1;
        match plan.stamp_column {
            Some("pago_em") => order.pago_em = Some(plan.stamp_value),
            Some("em_preparacao_em") => order.em_preparacao_em = Some(plan.stamp_value),
            Some("em_transito_em") => order.em_transito_em = Some(plan.stamp_value),
            Some("entregue_em") => order.entregue_em = Some(plan.stamp_value),
            Some("cancelado_em") => order.cancelado_em = Some(plan.stamp_value),
            _ => {}
        }
    }

    assert_eq!(order.estado, OrderState::Entregue);
    assert_eq!(order.version, 4);
    assert!(order.pago_em.is_some());
    assert!(order.em_preparacao_em.is_some());
    assert!(order.em_transito_em.is_some());
    assert!(order.entregue_em.is_some());
    assert!(order.cancelado_em.is_none());
}

#[test]
fn test_oversized_note_rejected() {
    let order = test_order(OrderState::Pendente);
    let nota = Some("x".repeat(501));

    let err = plan_transition(strict(), &order, OrderState::Pago, nota, "42").unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}

// ========================================================================
// Sequential numbers
// ========================================================================

#[test]
fn test_first_number_of_year() {
    let numero = number::next_number(number::ORDER_PREFIX, 2025, None).unwrap();
    assert_eq!(numero, "AGC-2025-00001");
}

#[test]
fn test_increment_existing_number() {
    let numero =
        number::next_number(number::ORDER_PREFIX, 2024, Some("AGC-2024-00007")).unwrap();
    assert_eq!(numero, "AGC-2024-00008");
}

#[test]
fn test_sequence_padding_and_overflow_width() {
    assert_eq!(number::format_number("AGC", 2025, 7), "AGC-2025-00007");
    // Acima de 5 dígitos o número alarga em vez de truncar
    assert_eq!(number::format_number("AGC", 2025, 123456), "AGC-2025-123456");
}

#[test]
fn test_invoice_prefix() {
    let numero = number::next_number(number::INVOICE_PREFIX, 2025, None).unwrap();
    assert_eq!(numero, "FCT-2025-00001");
}

#[test]
fn test_parse_sequence() {
    assert_eq!(number::parse_sequence("AGC-2025-00042"), Some(42));
    assert_eq!(number::parse_sequence("AGC-2025-garbage"), None);
    assert_eq!(number::year_prefix("AGC", 2025), "AGC-2025-");
}

#[test]
fn test_malformed_stored_number_is_an_error() {
    assert!(number::next_number("AGC", 2025, Some("AGC-2025-xyz")).is_err());
}

// ========================================================================
// Totals
// ========================================================================

#[test]
fn test_line_subtotal_scenario() {
    // 3 kg × Kz 500 → Kz 1500
    let subtotal = totals::line_subtotal(3, 500.0).unwrap();
    assert_eq!(subtotal, 1500.0);
}

#[test]
fn test_order_total_rule() {
    let subtotal = totals::order_subtotal(&[1500.0]).unwrap();
    assert_eq!(subtotal, 1500.0);

    // Sem taxa nem desconto, total == subtotal
    assert_eq!(totals::order_total(1500.0, 0.0, 0.0).unwrap(), 1500.0);
    // total = subtotal + taxa - desconto
    assert_eq!(totals::order_total(1500.0, 700.0, 200.0).unwrap(), 2000.0);
}

#[test]
fn test_total_never_negative() {
    assert_eq!(totals::order_total(100.0, 0.0, 500.0).unwrap(), 0.0);
}

#[test]
fn test_rounding_half_up() {
    // 3 × 33.335 = 100.005 → 100.01
    assert_eq!(totals::line_subtotal(3, 33.335).unwrap(), 100.01);
}

#[test]
fn test_invalid_amounts_rejected() {
    assert!(totals::line_subtotal(0, 500.0).is_err());
    assert!(totals::line_subtotal(-1, 500.0).is_err());
    assert!(totals::line_subtotal(3, -500.0).is_err());
    assert!(totals::line_subtotal(3, f64::NAN).is_err());
    assert!(totals::line_subtotal(3, f64::INFINITY).is_err());
    assert!(totals::line_subtotal(10000, 500.0).is_err());
}

#[test]
fn test_totals_consistent() {
    assert!(totals::totals_consistent(1500.0, 700.0, 200.0, 2000.0));
    assert!(!totals::totals_consistent(1500.0, 700.0, 200.0, 1500.0));
}
