//! Fluxo completo de encomendas contra uma base SQLite real (ficheiro temporário)

use agri_server::db::DbService;
use agri_server::db::repository::{category, order, product, user};
use agri_server::orders::{TransitionPolicy, plan_transition, totals};
use agri_server::utils::time::{DEFAULT_TZ, current_year, parse_tz};
use shared::error::ErrorCode;
use shared::models::{CategoryCreate, ProductCreate, Role};
use shared::order::{OrderCreate, OrderItemInput, OrderState};
use sqlx::SqlitePool;

struct TestContext {
    pool: SqlitePool,
    // Mantém o directório vivo durante o teste
    _dir: tempfile::TempDir,
}

async fn setup() -> TestContext {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("test.db");
    let service = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("database init");
    TestContext {
        pool: service.pool,
        _dir: dir,
    }
}

async fn seed_customer(pool: &SqlitePool) -> i64 {
    let hash = agri_server::auth::password::hash_password("password-123").unwrap();
    let user = user::create(
        pool,
        "Maria dos Santos",
        "maria@exemplo.ao",
        Some("+244 900 000 000"),
        &hash,
        Role::Customer,
    )
    .await
    .expect("create user");
    user.id
}

/// Categoria + produto (Kz 500, estoque 10); devolve o id do produto
async fn seed_catalog(pool: &SqlitePool) -> i64 {
    let cat = category::create(
        pool,
        CategoryCreate {
            nome: "Legumes".into(),
            descricao: None,
            sort_order: None,
        },
    )
    .await
    .expect("create category");

    let produto = product::create(
        pool,
        ProductCreate {
            nome: "Tomate".into(),
            descricao: Some("Tomate fresco do Huambo".into()),
            categoria_id: cat.id,
            preco: 500.0,
            unidade: Some("kg".into()),
            estoque: Some(10),
            imagem: None,
        },
    )
    .await
    .expect("create product");
    produto.id
}

fn cart(produto_id: i64, quantidade: i64) -> OrderCreate {
    OrderCreate {
        itens: vec![OrderItemInput {
            produto_id,
            quantidade,
        }],
        endereco_entrega: Some("Bairro Azul, Luanda".into()),
        nota: None,
    }
}

fn year() -> i32 {
    current_year(parse_tz(DEFAULT_TZ))
}

#[tokio::test]
async fn test_checkout_creates_pendente_order_with_seed_history() {
    let ctx = setup().await;
    let user_id = seed_customer(&ctx.pool).await;
    let produto_id = seed_catalog(&ctx.pool).await;

    let detail = order::create(&ctx.pool, user_id, &cart(produto_id, 3), 0.0, year())
        .await
        .expect("create order");

    // 3 kg × Kz 500 → subtotal 1500, total 1500 (sem taxa nem desconto)
    let encomenda = &detail.encomenda;
    assert_eq!(encomenda.estado, OrderState::Pendente);
    assert_eq!(encomenda.subtotal, 1500.0);
    assert_eq!(encomenda.taxa_entrega, 0.0);
    assert_eq!(encomenda.desconto, 0.0);
    assert_eq!(encomenda.total, 1500.0);
    assert!(encomenda.numero.ends_with("00001"));
    assert!(encomenda.numero.starts_with(&format!("AGC-{}-", year())));
    assert!(totals::totals_consistent(
        encomenda.subtotal,
        encomenda.taxa_entrega,
        encomenda.desconto,
        encomenda.total
    ));

    // Uma entrada seed no histórico, em PENDENTE, actor "sistema"
    assert_eq!(detail.historico.len(), 1);
    assert_eq!(detail.historico[0].estado, OrderState::Pendente);
    assert_eq!(detail.historico[0].actor, "sistema");

    // Baixa de estoque: 10 - 3 = 7
    let produto = product::find_by_id(&ctx.pool, produto_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(produto.estoque, 7);
}

#[tokio::test]
async fn test_order_numbers_are_sequential() {
    let ctx = setup().await;
    let user_id = seed_customer(&ctx.pool).await;
    let produto_id = seed_catalog(&ctx.pool).await;

    let first = order::create(&ctx.pool, user_id, &cart(produto_id, 1), 0.0, year())
        .await
        .unwrap();
    let second = order::create(&ctx.pool, user_id, &cart(produto_id, 1), 0.0, year())
        .await
        .unwrap();

    assert!(first.encomenda.numero.ends_with("00001"));
    assert!(second.encomenda.numero.ends_with("00002"));
}

#[tokio::test]
async fn test_transition_to_pago_stamps_and_appends_history() {
    let ctx = setup().await;
    let user_id = seed_customer(&ctx.pool).await;
    let produto_id = seed_catalog(&ctx.pool).await;

    let detail = order::create(&ctx.pool, user_id, &cart(produto_id, 3), 0.0, year())
        .await
        .unwrap();
    let encomenda = detail.encomenda;

    let plan = plan_transition(
        TransitionPolicy::default(),
        &encomenda,
        OrderState::Pago,
        Some("transferência confirmada".into()),
        "42",
    )
    .unwrap()
    .expect("plan must exist");

    let updated = order::apply_transition(&ctx.pool, encomenda.id, &plan)
        .await
        .expect("apply transition");

    assert_eq!(updated.estado, OrderState::Pago);
    assert!(updated.pago_em.is_some());
    assert_eq!(updated.version, encomenda.version + 1);

    // O estado corrente é o da última entrada do histórico
    let historico = order::find_history(&ctx.pool, encomenda.id).await.unwrap();
    assert_eq!(historico.len(), 2);
    assert_eq!(historico[0].estado, OrderState::Pago); // mais recente primeiro
    assert_eq!(historico[0].actor, "42");
    assert_eq!(
        historico[0].nota.as_deref(),
        Some("transferência confirmada")
    );
    assert_eq!(updated.estado, historico[0].estado);
}

#[tokio::test]
async fn test_idempotent_transition_appends_nothing() {
    let ctx = setup().await;
    let user_id = seed_customer(&ctx.pool).await;
    let produto_id = seed_catalog(&ctx.pool).await;

    let detail = order::create(&ctx.pool, user_id, &cart(produto_id, 1), 0.0, year())
        .await
        .unwrap();

    // Transição para o estado actual: no-op, sem plano
    let plan = plan_transition(
        TransitionPolicy::default(),
        &detail.encomenda,
        OrderState::Pendente,
        None,
        "42",
    )
    .unwrap();
    assert!(plan.is_none());

    let historico = order::find_history(&ctx.pool, detail.encomenda.id)
        .await
        .unwrap();
    assert_eq!(historico.len(), 1);
}

#[tokio::test]
async fn test_cancel_from_pendente_restores_stock() {
    let ctx = setup().await;
    let user_id = seed_customer(&ctx.pool).await;
    let produto_id = seed_catalog(&ctx.pool).await;

    let detail = order::create(&ctx.pool, user_id, &cart(produto_id, 4), 0.0, year())
        .await
        .unwrap();
    let encomenda = detail.encomenda;

    let antes = product::find_by_id(&ctx.pool, produto_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(antes.estoque, 6);

    let plan = plan_transition(
        TransitionPolicy::default(),
        &encomenda,
        OrderState::Cancelado,
        Some("cliente desistiu".into()),
        "sistema",
    )
    .unwrap()
    .unwrap();

    let updated = order::apply_transition(&ctx.pool, encomenda.id, &plan)
        .await
        .unwrap();

    assert_eq!(updated.estado, OrderState::Cancelado);
    assert!(updated.cancelado_em.is_some());
    assert!(updated.pago_em.is_none());

    // Exactamente uma entrada nova no histórico
    let historico = order::find_history(&ctx.pool, encomenda.id).await.unwrap();
    assert_eq!(historico.len(), 2);
    assert_eq!(historico[0].estado, OrderState::Cancelado);

    // Estoque reposto
    let depois = product::find_by_id(&ctx.pool, produto_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(depois.estoque, 10);
}

#[tokio::test]
async fn test_stale_version_is_rejected() {
    let ctx = setup().await;
    let user_id = seed_customer(&ctx.pool).await;
    let produto_id = seed_catalog(&ctx.pool).await;

    let detail = order::create(&ctx.pool, user_id, &cart(produto_id, 1), 0.0, year())
        .await
        .unwrap();
    let encomenda = detail.encomenda;

    let plan = plan_transition(
        TransitionPolicy::default(),
        &encomenda,
        OrderState::Pago,
        None,
        "42",
    )
    .unwrap()
    .unwrap();

    order::apply_transition(&ctx.pool, encomenda.id, &plan)
        .await
        .expect("first apply");

    // Segundo escritor com a mesma versão lida: conflito, sem histórico extra
    let err = order::apply_transition(&ctx.pool, encomenda.id, &plan)
        .await
        .expect_err("second apply must conflict");
    let app_err: agri_server::AppError = err.into();
    assert_eq!(app_err.code, ErrorCode::OrderStateConflict);

    let historico = order::find_history(&ctx.pool, encomenda.id).await.unwrap();
    assert_eq!(historico.len(), 2);
}

#[tokio::test]
async fn test_out_of_stock_rejected() {
    let ctx = setup().await;
    let user_id = seed_customer(&ctx.pool).await;
    let produto_id = seed_catalog(&ctx.pool).await;

    let err = order::create(&ctx.pool, user_id, &cart(produto_id, 11), 0.0, year())
        .await
        .expect_err("must reject quantity above stock");
    let app_err: agri_server::AppError = err.into();
    assert_eq!(app_err.code, ErrorCode::ProductOutOfStock);
}

#[tokio::test]
async fn test_empty_cart_rejected() {
    let ctx = setup().await;
    let user_id = seed_customer(&ctx.pool).await;

    let payload = OrderCreate {
        itens: vec![],
        endereco_entrega: None,
        nota: None,
    };
    let err = order::create(&ctx.pool, user_id, &payload, 0.0, year())
        .await
        .expect_err("empty cart must be rejected");
    let app_err: agri_server::AppError = err.into();
    assert_eq!(app_err.code, ErrorCode::OrderEmpty);
}

#[tokio::test]
async fn test_delivery_fee_enters_total() {
    let ctx = setup().await;
    let user_id = seed_customer(&ctx.pool).await;
    let produto_id = seed_catalog(&ctx.pool).await;

    let detail = order::create(&ctx.pool, user_id, &cart(produto_id, 2), 700.0, year())
        .await
        .unwrap();

    // total = subtotal + taxa_entrega - desconto = 1000 + 700 - 0
    assert_eq!(detail.encomenda.subtotal, 1000.0);
    assert_eq!(detail.encomenda.total, 1700.0);
}
