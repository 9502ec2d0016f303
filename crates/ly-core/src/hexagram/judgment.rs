//! Judgment texts (卦辞) in King Wen order, without the leading name.

#[rustfmt::skip]
pub(super) static JUDGMENTS: [&str; 64] = [
    "元亨，利贞。",
    "元亨，利牝马之贞。君子有攸往，先迷后得主，利。西南得朋，东北丧朋。安贞吉。",
    "元亨，利贞。勿用有攸往，利建侯。",
    "亨。匪我求童蒙，童蒙求我。初筮告，再三渎，渎则不告。利贞。",
    "有孚，光亨，贞吉。利涉大川。",
    "有孚，窒惕，中吉，终凶。利见大人，不利涉大川。",
    "贞，丈人吉，无咎。",
    "吉。原筮元永贞，无咎。不宁方来，后夫凶。",
    "亨。密云不雨，自我西郊。",
    "履虎尾，不咥人，亨。",
    "小往大来，吉亨。",
    "否之匪人，不利君子贞，大往小来。",
    "同人于野，亨。利涉大川，利君子贞。",
    "元亨。",
    "亨，君子有终。",
    "利建侯行师。",
    "元亨利贞，无咎。",
    "元亨，利涉大川。先甲三日，后甲三日。",
    "元亨利贞。至于八月有凶。",
    "盥而不荐，有孚颙若。",
    "亨。利用狱。",
    "亨。小利有攸往。",
    "不利有攸往。",
    "亨。出入无疾，朋来无咎。反复其道，七日来复，利有攸往。",
    "元亨利贞。其匪正有眚，不利有攸往。",
    "利贞，不家食吉，利涉大川。",
    "贞吉。观颐，自求口实。",
    "栋桡，利有攸往，亨。",
    "习坎，有孚，维心亨，行有尚。",
    "利贞，亨。畜牝牛，吉。",
    "亨，利贞，取女吉。",
    "亨，无咎，利贞，利有攸往。",
    "亨，小利贞。",
    "利贞。",
    "康侯用锡马蕃庶，昼日三接。",
    "利艰贞。",
    "利女贞。",
    "小事吉。",
    "利西南，不利东北。利见大人，贞吉。",
    "利西南，无所往，其来复吉。有攸往，夙吉。",
    "有孚，元吉，无咎，可贞，利有攸往。曷之用，二簋可用享。",
    "利有攸往，利涉大川。",
    "扬于王庭，孚号有厉，告自邑，不利即戎，利有攸往。",
    "女壮，勿用取女。",
    "亨。王假有庙，利见大人，亨，利贞。用大牲吉，利有攸往。",
    "元亨，用见大人，勿恤，南征吉。",
    "亨，贞，大人吉，无咎，有言不信。",
    "改邑不改井，无丧无得，往来井井。汔至，亦未繘井，羸其瓶，凶。",
    "己日乃孚，元亨利贞，悔亡。",
    "元吉，亨。",
    "亨。震来虩虩，笑言哑哑。震惊百里，不丧匕鬯。",
    "艮其背，不获其身，行其庭，不见其人，无咎。",
    "女归吉，利贞。",
    "征凶，无攸利。",
    "亨，王假之，勿忧，宜日中。",
    "小亨，旅贞吉。",
    "小亨，利有攸往，利见大人。",
    "亨，利贞。",
    "亨。王假有庙，利涉大川，利贞。",
    "亨。苦节不可贞。",
    "豚鱼吉，利涉大川，利贞。",
    "亨，利贞，可小事，不可大事。飞鸟遗之音，不宜上宜下，大吉。",
    "亨小，利贞，初吉终乱。",
    "亨，小狐汔济，濡其尾，无攸利。",
];
