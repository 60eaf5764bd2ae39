//! 房间模块测试
//!
//! 空闲超时相关的测试使用暂停的 tokio 时钟。

use super::*;

const IDLE: Duration = Duration::from_secs(120);

// ============================================================================
// Room 测试
// ============================================================================

/// 二维码变更推送给所有已加入的客户端
#[tokio::test]
async fn test_qr_code_broadcast() {
    let room = Room::spawn(IDLE);
    let mut cli1 = room.join().await.unwrap();
    let mut cli2 = room.join().await.unwrap();
    assert_ne!(cli1.id(), cli2.id());

    room.set_qr_code("qrcode").await.unwrap();

    assert_eq!(
        cli1.recv().await,
        Some(ClientEvent::QrCodeChanged("qrcode".to_string()))
    );
    assert_eq!(
        cli2.recv().await,
        Some(ClientEvent::QrCodeChanged("qrcode".to_string()))
    );
    assert_eq!(room.qr_code().await.unwrap(), "qrcode");
}

/// 离开的客户端不再收到通知
#[tokio::test]
async fn test_client_leave() {
    let room = Room::spawn(IDLE);
    let mut cli1 = room.join().await.unwrap();
    let mut cli2 = room.join().await.unwrap();

    room.leave(cli2.id()).await.unwrap();
    room.set_qr_code("second").await.unwrap();
    // 查询是一次往返，保证之前的命令已处理
    assert_eq!(room.client_count().await.unwrap(), 1);

    assert_eq!(
        cli1.try_recv(),
        Some(ClientEvent::QrCodeChanged("second".to_string()))
    );
    assert_eq!(cli2.try_recv(), None);
}

/// 丢弃的客户端在下一次推送时被清理
#[tokio::test]
async fn test_dropped_client_is_pruned() {
    let room = Room::spawn(IDLE);
    let _cli1 = room.join().await.unwrap();
    let cli2 = room.join().await.unwrap();
    assert_eq!(room.client_count().await.unwrap(), 2);

    drop(cli2);
    room.set_qr_code("x").await.unwrap();
    assert_eq!(room.client_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_initial_qr_code_is_empty() {
    let room = Room::spawn(IDLE);
    assert_eq!(room.qr_code().await.unwrap(), "");
    assert_eq!(room.client_count().await.unwrap(), 0);
}

/// 关闭房间时通知客户端，之后的命令失败
#[tokio::test]
async fn test_close_notifies_clients() {
    let room = Room::spawn(IDLE);
    let mut cli = room.join().await.unwrap();

    room.close().await;
    assert!(room.is_closed());
    assert_eq!(cli.recv().await, Some(ClientEvent::Closed));
    assert_eq!(cli.recv().await, None);

    assert_eq!(room.set_qr_code("late").await, Err(RoomError::Closed));
    assert_eq!(room.qr_code().await, Err(RoomError::Closed));
    assert!(matches!(room.join().await, Err(RoomError::Closed)));

    // 重复关闭无效果
    room.close().await;
}

/// 空闲超时后房间自动关闭
#[tokio::test(start_paused = true)]
async fn test_idle_timeout() {
    let room = Room::spawn(Duration::from_secs(2));
    let mut cli = room.join().await.unwrap();

    tokio::time::sleep(Duration::from_secs(1)).await;
    room.set_qr_code("keepalive").await.unwrap();
    assert_eq!(
        cli.recv().await,
        Some(ClientEvent::QrCodeChanged("keepalive".to_string()))
    );

    // 活动刷新了截止时间
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!room.is_closed());

    assert_eq!(cli.recv().await, Some(ClientEvent::Closed));
    room.closed().await;
    assert!(room.is_closed());
}

/// 超时大到无法表示时房间永不过期，但仍可正常使用和关闭
#[tokio::test(start_paused = true)]
async fn test_unbounded_idle_room_stays_usable() {
    let room = Room::spawn(Duration::MAX);
    let mut cli = room.join().await.unwrap();

    room.set_qr_code("forever").await.unwrap();
    assert_eq!(
        cli.recv().await,
        Some(ClientEvent::QrCodeChanged("forever".to_string()))
    );

    tokio::time::sleep(Duration::from_secs(365 * 24 * 3600)).await;
    assert!(!room.is_closed());
    assert_eq!(room.qr_code().await.unwrap(), "forever");

    room.close().await;
    room.closed().await;
    assert!(room.is_closed());
    assert_eq!(cli.recv().await, Some(ClientEvent::Closed));
}

/// 零超时的房间立即关闭
#[tokio::test(start_paused = true)]
async fn test_zero_idle_room_closes_immediately() {
    let room = Room::spawn(Duration::ZERO);
    room.closed().await;
    assert_eq!(room.qr_code().await, Err(RoomError::Closed));
}

// ============================================================================
// RoomPool 测试
// ============================================================================

#[tokio::test]
async fn test_pool_create_duplicate() {
    let pool = RoomPool::new(IDLE);
    pool.create_room_with_password("room1", RoomPassword(1))
        .await
        .unwrap();

    assert_eq!(
        pool.create_room("room1").await,
        Err(RoomError::AlreadyExists("room1".to_string()))
    );
    assert_eq!(pool.room_names().await, vec!["room1".to_string()]);
}

#[tokio::test]
async fn test_pool_authorize() {
    let pool = RoomPool::new(IDLE);
    let password = pool.create_room("room1").await.unwrap();

    assert!(pool.authorize("room1", password).await.is_ok());
    assert_eq!(
        pool.authorize("room1", RoomPassword(password.0.wrapping_add(1)))
            .await
            .unwrap_err(),
        RoomError::WrongPassword
    );
    assert_eq!(
        pool.get_room("nope").await.unwrap_err(),
        RoomError::NotFound("nope".to_string())
    );
}

#[tokio::test]
async fn test_pool_update_qr_code() {
    let pool = RoomPool::new(IDLE);
    let password = pool.create_room("room1").await.unwrap();
    let room = pool.get_room("room1").await.unwrap();
    let mut cli = room.join().await.unwrap();

    pool.update_qr_code("room1", password, "payload")
        .await
        .unwrap();
    assert_eq!(
        cli.recv().await,
        Some(ClientEvent::QrCodeChanged("payload".to_string()))
    );

    assert_eq!(
        pool.update_qr_code("room1", RoomPassword(password.0 ^ 1), "evil")
            .await,
        Err(RoomError::WrongPassword)
    );
    assert_eq!(room.qr_code().await.unwrap(), "payload");
}

#[tokio::test]
async fn test_pool_delete_room() {
    let pool = RoomPool::new(IDLE);
    pool.create_room_with_password("room1", RoomPassword(7))
        .await
        .unwrap();
    let room = pool.get_room("room1").await.unwrap();
    let mut cli = room.join().await.unwrap();

    assert_eq!(
        pool.delete_room("room1", RoomPassword(8)).await,
        Err(RoomError::WrongPassword)
    );
    assert!(!room.is_closed());

    pool.delete_room("room1", RoomPassword(7)).await.unwrap();
    assert!(room.is_closed());
    assert_eq!(cli.recv().await, Some(ClientEvent::Closed));
    assert!(pool.room_names().await.is_empty());

    // 同名房间可以重新创建
    pool.create_room_with_password("room1", RoomPassword(9))
        .await
        .unwrap();
    assert!(pool.authorize("room1", RoomPassword(9)).await.is_ok());
}

/// 空闲关闭的房间从池中消失
#[tokio::test(start_paused = true)]
async fn test_pool_forgets_idle_room() {
    let pool = RoomPool::new(Duration::from_secs(2));
    pool.create_room("room1").await.unwrap();
    let room = pool.get_room("room1").await.unwrap();

    room.closed().await;
    // 让监视任务运行
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(
        pool.get_room("room1").await.unwrap_err(),
        RoomError::NotFound("room1".to_string())
    );
}

/// 旧房间的监视任务不会移除同名的新房间
#[tokio::test]
async fn test_pool_monitor_keeps_new_room() {
    let pool = RoomPool::new(IDLE);
    pool.create_room_with_password("room1", RoomPassword(1))
        .await
        .unwrap();
    pool.delete_room("room1", RoomPassword(1)).await.unwrap();
    pool.create_room_with_password("room1", RoomPassword(2))
        .await
        .unwrap();

    tokio::task::yield_now().await;
    tokio::task::yield_now().await;

    let room = pool.authorize("room1", RoomPassword(2)).await.unwrap();
    assert!(!room.is_closed());
}

#[tokio::test]
async fn test_pool_room_names_sorted() {
    let pool = RoomPool::new(IDLE);
    for name in ["c", "a", "b"] {
        pool.create_room(name).await.unwrap();
    }
    assert_eq!(pool.room_names().await, vec!["a", "b", "c"]);
}

/// 配置中的超大超时值不会让房间失效
#[tokio::test(start_paused = true)]
async fn test_pool_with_unbounded_idle_from_settings() {
    let settings = crate::config::AppSettings {
        room_idle_timeout_secs: u64::MAX,
        ..Default::default()
    };
    let pool = RoomPool::from_settings(&settings);
    let password = pool.create_room("room1").await.unwrap();
    let room = pool.get_room("room1").await.unwrap();
    let mut cli = room.join().await.unwrap();

    pool.update_qr_code("room1", password, "payload")
        .await
        .unwrap();
    assert_eq!(
        cli.recv().await,
        Some(ClientEvent::QrCodeChanged("payload".to_string()))
    );

    tokio::time::sleep(Duration::from_secs(30 * 24 * 3600)).await;
    assert_eq!(pool.room_names().await, vec!["room1"]);

    room.close().await;
    room.closed().await;
    assert_eq!(cli.recv().await, Some(ClientEvent::Closed));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(pool.room_names().await.is_empty());
}

/// 零超时的房间创建后立即从池中移除
#[tokio::test(start_paused = true)]
async fn test_pool_drops_zero_idle_room() {
    let pool = RoomPool::new(Duration::ZERO);
    pool.create_room("room1").await.unwrap();

    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(
        pool.get_room("room1").await.unwrap_err(),
        RoomError::NotFound("room1".to_string())
    );
    assert!(pool.room_names().await.is_empty());
}
