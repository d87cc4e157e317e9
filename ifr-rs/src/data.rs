//! Built-in survey data used to derive and test IFR models.
use crate::prelude::{Age, Real};

/// Upper age sentinel used by the ENE-COVID survey tables.
pub const SURVEY_MAXAGE: Age = 199;

/// Antibody prevalence (%) by age bracket in the Spanish ENE-COVID
/// serosurvey, 27 April to 11 May 2020.
pub const ENE_COVID_PREVALENCE: [(Age, Age, Real); 20] = [
    (0, 0, 1.1),
    (1, 4, 2.2),
    (5, 9, 3.0),
    (10, 14, 3.9),
    (15, 19, 3.8),
    (20, 24, 4.5),
    (25, 29, 4.8),
    (30, 34, 3.8),
    (35, 39, 4.6),
    (40, 44, 5.3),
    (45, 49, 5.7),
    (50, 54, 5.8),
    (55, 59, 6.1),
    (60, 64, 5.9),
    (65, 69, 6.2),
    (70, 74, 6.9),
    (75, 79, 6.1),
    (80, 84, 5.1),
    (85, 89, 5.6),
    (90, 199, 5.8),
];

/// Deaths with known age in Spain as of 11 May 2020.
pub const SPAIN_DEATHS_BY_AGE: [(Age, Age, Real); 10] = [
    (0, 9, 2.0),
    (10, 19, 5.0),
    (20, 29, 23.0),
    (30, 39, 61.0),
    (40, 49, 197.0),
    (50, 59, 605.0),
    (60, 69, 1654.0),
    (70, 79, 4529.0),
    (80, 89, 7688.0),
    (90, 199, 3958.0),
];

/// Total reported deaths in Spain as of 11 May 2020, including 8022 deaths
/// with unknown age.
pub const SPAIN_TOTAL_DEATHS: Real = 26744.0;

/// Population of Spain by single year of age, 0 to 100.
pub const PYRAMID_SPAIN: [Real; 101] = [
    389071.0, 395760.0, 404555.0, 414953.0, 411842.0, 432086.0, 450617.0, 467032.0, 480928.0,
    493573.0, 506233.0, 510163.0, 501625.0, 485224.0, 469003.0, 450996.0, 438622.0, 436275.0,
    440530.0, 443668.0, 447359.0, 450865.0, 453090.0, 454935.0, 458810.0, 464718.0, 470848.0,
    476697.0, 483276.0, 491535.0, 500604.0, 515444.0, 538403.0, 566972.0, 594959.0, 622001.0,
    652353.0, 686993.0, 723042.0, 757510.0, 792033.0, 815052.0, 820836.0, 814644.0, 807993.0,
    799212.0, 788640.0, 777807.0, 766575.0, 752713.0, 736006.0, 722714.0, 715523.0, 711721.0,
    706221.0, 700412.0, 690511.0, 674241.0, 653635.0, 633659.0, 614107.0, 592701.0, 569064.0,
    544537.0, 519985.0, 494201.0, 475071.0, 466281.0, 463940.0, 460575.0, 457809.0, 451462.0,
    438746.0, 421694.0, 405814.0, 390815.0, 372987.0, 351294.0, 327555.0, 303574.0, 277747.0,
    258748.0, 250683.0, 249083.0, 246213.0, 244626.0, 235612.0, 214376.0, 185512.0, 155765.0,
    131040.0, 113392.0, 91852.0, 66359.0, 48324.0, 40084.0, 32862.0, 24229.0, 14184.0, 8251.0,
    12310.0,
];

/// Population of the USA by single year of age, 0 to 100.
pub const PYRAMID_USA: [Real; 101] = [
    3931967.0, 3919500.0, 3919461.0, 3930158.0, 3903010.0, 3955644.0, 4008192.0, 4059364.0,
    4107872.0, 4156677.0, 4208742.0, 4241520.0, 4245220.0, 4231306.0, 4220681.0, 4208740.0,
    4210781.0, 4236404.0, 4278618.0, 4316059.0, 4347272.0, 4397310.0, 4474657.0, 4565701.0,
    4651027.0, 4737732.0, 4788205.0, 4782769.0, 4739004.0, 4695388.0, 4645691.0, 4592419.0,
    4541165.0, 4490237.0, 4433909.0, 4375200.0, 4315098.0, 4254149.0, 4194587.0, 4137614.0,
    4082405.0, 4040406.0, 4017264.0, 4008404.0, 4003094.0, 4002870.0, 4009404.0, 4022256.0,
    4040872.0, 4061465.0, 4080383.0, 4112964.0, 4165027.0, 4226569.0, 4281521.0, 4332795.0,
    4362769.0, 4360922.0, 4333852.0, 4300884.0, 4260806.0, 4197638.0, 4106208.0, 3993650.0,
    3871350.0, 3735929.0, 3602786.0, 3480392.0, 3361570.0, 3234769.0, 3107225.0, 2956039.0,
    2770249.0, 2564001.0, 2361344.0, 2156197.0, 1973453.0, 1827535.0, 1707062.0, 1586129.0,
    1469802.0, 1357365.0, 1245835.0, 1137042.0, 1035221.0, 938832.0, 849231.0, 767290.0,
    691462.0, 616131.0, 563171.0, 502660.0, 421119.0, 320109.0, 246668.0, 212578.0, 178289.0,
    135554.0, 84374.0, 52727.0, 89949.0,
];
